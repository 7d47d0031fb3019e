//! Parity tests against lcms2
//!
//! Reference profiles are built and serialised by lcms2, then parsed by
//! oxicc, so both engines read the same bytes. Synthetic profiles from
//! [`icc_tests::fixtures`] go the other way and are loaded into lcms2.

use std::slice;

use anyhow::{Context, Result};
use icc_tests::accuracy::{DeltaEStats, compare_rgb_f64, max_abs_diff};
use icc_tests::fixtures::{cmyk_profile_bytes, gray_profile_bytes, srgb_profile_bytes};
use icc_tests::parity::{ParityReport, ParityTest};
use icc_tests::patterns::{TestPattern, generate_pattern, random_unit_pixels};
use lcms2::{CIExyY, Intent, PixelFormat, ToneCurve};
use oxicc_core::{ColorSpace, Lab, Profile, RenderingIntent, TransformOptions, Xyz};

const D50_XYY: CIExyY = CIExyY {
    x: 0.3457,
    y: 0.3585,
    Y: 1.0,
};

fn lcms_srgb_bytes() -> Result<Vec<u8>> {
    lcms2::Profile::new_srgb()
        .icc()
        .context("lcms2 could not serialise sRGB")
}

fn parse(bytes: &[u8]) -> Result<Profile> {
    Profile::parse(bytes).context("oxicc rejected the profile")
}

/// Our device → PCS result as XYZ, whatever the PCS
fn to_pcs_xyz(profile: &Profile, device: &[f64], intent: RenderingIntent) -> Result<Xyz> {
    let pipeline = profile.to_pcs_pipeline(device.len(), TransformOptions::new().with_intent(intent))?;
    let mut pcs = [0.0; 3];
    pipeline.transform_general(device, &mut pcs);
    Ok(match profile.pcs() {
        ColorSpace::Lab => Lab::from_array(pcs).to_xyz(),
        _ => Xyz::from_array(pcs),
    })
}

#[test]
fn test_lcms_srgb_parses() -> Result<()> {
    let profile = parse(&lcms_srgb_bytes()?)?;
    assert_eq!(profile.color_space(), ColorSpace::Rgb);
    assert!(profile.is_matrix_shaper());
    assert!(!profile.is_lut_based());
    Ok(())
}

#[test]
fn test_srgb_to_xyz_matches_lcms() -> Result<()> {
    let bytes = lcms_srgb_bytes()?;
    let profile = parse(&bytes)?;
    // Reloaded, so lcms2 also sees the s15Fixed16-rounded colorants
    let lcms_srgb = lcms2::Profile::new_icc(&bytes)?;
    let lcms_xyz = lcms2::Profile::new_xyz();
    let transform = lcms2::Transform::<[f32; 3], [f32; 3]>::new(
        &lcms_srgb,
        PixelFormat::RGB_FLT,
        &lcms_xyz,
        PixelFormat::XYZ_FLT,
        Intent::RelativeColorimetric,
    )?;

    let samples = random_unit_pixels(11, 500, 3);
    let mut worst = 0.0f64;
    for px in samples.chunks_exact(3) {
        let input = [px[0] as f32, px[1] as f32, px[2] as f32];
        let mut reference = [0.0f32; 3];
        transform.transform_pixels(slice::from_ref(&input), slice::from_mut(&mut reference));

        let ours = to_pcs_xyz(&profile, px, RenderingIntent::RelativeColorimetric)?;
        let reference = reference.map(f64::from);
        worst = worst.max(max_abs_diff(&reference, &ours.to_array()));
    }
    // f32 reference
    assert!(worst < 5e-4, "sRGB -> XYZ max abs diff {}", worst);
    Ok(())
}

#[test]
fn test_srgb_rgb8_patterns_match_lcms() -> Result<()> {
    let profile = parse(&lcms_srgb_bytes()?)?;
    let ours = profile.to_srgb_pipeline(3, TransformOptions::default())?;

    let lcms_srgb = lcms2::Profile::new_srgb();
    let transform = lcms2::Transform::new(
        &lcms_srgb,
        PixelFormat::RGB_8,
        &lcms_srgb,
        PixelFormat::RGB_8,
        Intent::Perceptual,
    )?;

    let mut report = ParityReport::new();
    for pattern in TestPattern::ALL {
        let input = generate_pattern(pattern, 4096);
        let mut reference = vec![0u8; input.len()];
        transform.transform_pixels(&input, &mut reference);
        let mut output = vec![0u8; input.len()];
        ours.transform_rgb8(&input, &mut output)?;

        report.push(ParityTest::new(format!("sRGB rgb8 {:?}", pattern)).run(&output, &reference));
    }
    assert!(report.failures().is_empty(), "\n{}", report);
    Ok(())
}

#[test]
fn test_srgb_rgb16_matches_lcms() -> Result<()> {
    let profile = parse(&lcms_srgb_bytes()?)?;
    let ours = profile.to_srgb_pipeline(3, TransformOptions::default())?;

    let lcms_srgb = lcms2::Profile::new_srgb();
    let transform = lcms2::Transform::<[u16; 3], [u16; 3]>::new(
        &lcms_srgb,
        PixelFormat::RGB_16,
        &lcms_srgb,
        PixelFormat::RGB_16,
        Intent::RelativeColorimetric,
    )?;

    let pixels: Vec<[u16; 3]> = random_unit_pixels(5, 1000, 3)
        .chunks_exact(3)
        .map(|px| [px[0], px[1], px[2]].map(|v| (v * 65535.0).round() as u16))
        .collect();
    let mut reference_pixels = vec![[0u16; 3]; pixels.len()];
    transform.transform_pixels(&pixels, &mut reference_pixels);
    let reference: Vec<u16> = reference_pixels.iter().flatten().copied().collect();

    let input: Vec<u16> = pixels.iter().flatten().copied().collect();
    let mut output = vec![0u16; input.len()];
    ours.transform_rgb16(&input, &mut output)?;

    let as_unit = |buf: &[u16]| -> Vec<[f64; 3]> {
        buf.chunks_exact(3)
            .map(|px| [px[0], px[1], px[2]].map(|v| f64::from(v) / 65535.0))
            .collect()
    };
    let stats: DeltaEStats = compare_rgb_f64(&as_unit(&reference), &as_unit(&output));
    let result = ParityTest::new("sRGB rgb16").judge(stats);
    assert!(result.passed, "{}", result);
    Ok(())
}

#[test]
fn test_gray_to_xyz_matches_lcms() -> Result<()> {
    let gamma = ToneCurve::new(2.2);
    let lcms_gray = lcms2::Profile::new_gray(&D50_XYY, &gamma)?;
    let profile = parse(&lcms_gray.icc()?)?;
    assert_eq!(profile.color_space(), ColorSpace::Gray);

    let lcms_xyz = lcms2::Profile::new_xyz();
    let transform = lcms2::Transform::<[u8; 1], [f64; 3]>::new(
        &lcms_gray,
        PixelFormat::GRAY_8,
        &lcms_xyz,
        PixelFormat::XYZ_DBL,
        Intent::RelativeColorimetric,
    )?;

    for level in (0..=255u8).step_by(15) {
        let mut reference = [0.0f64; 3];
        transform.transform_pixels(slice::from_ref(&[level]), slice::from_mut(&mut reference));

        let ours = to_pcs_xyz(&profile, &[f64::from(level) / 255.0], RenderingIntent::RelativeColorimetric)?;
        assert!(
            (ours.y - reference[1]).abs() < 2e-3,
            "gray {}: Y {} vs lcms2 {}",
            level,
            ours.y,
            reference[1]
        );
    }
    Ok(())
}

#[test]
fn test_synthetic_srgb_matches_lcms_builtin() -> Result<()> {
    // Our builder's bytes, loaded by lcms2, against lcms2's own sRGB
    let ours = lcms2::Profile::new_icc(&srgb_profile_bytes())?;
    let builtin = lcms2::Profile::new_srgb();
    let transform = lcms2::Transform::new(
        &ours,
        PixelFormat::RGB_8,
        &builtin,
        PixelFormat::RGB_8,
        Intent::RelativeColorimetric,
    )?;

    let input = generate_pattern(TestPattern::Random(3), 2048);
    let mut output = vec![0u8; input.len()];
    transform.transform_pixels(&input, &mut output);

    let result = ParityTest::new("synthetic sRGB").run(&output, &input);
    assert!(result.passed, "{}", result);
    Ok(())
}

#[test]
fn test_cmyk_lut_matches_lcms() -> Result<()> {
    let bytes = cmyk_profile_bytes();
    let profile = parse(&bytes)?;
    let lcms_cmyk = lcms2::Profile::new_icc(&bytes)?;
    let lcms_lab = lcms2::Profile::new_lab4_context(lcms2::GlobalContext::new(), &D50_XYY)?;
    let transform = lcms2::Transform::<[u8; 4], [f64; 3]>::new(
        &lcms_cmyk,
        PixelFormat::CMYK_8,
        &lcms_lab,
        PixelFormat::Lab_DBL,
        Intent::RelativeColorimetric,
    )?;
    // No A2B1, so both engines fall back to A2B0
    let ours = profile.to_pcs_pipeline(
        4,
        TransformOptions::new().with_intent(RenderingIntent::RelativeColorimetric),
    )?;

    let cases: [[u8; 4]; 5] = [
        [0, 0, 0, 0],
        [0, 0, 0, 255],
        [255, 0, 0, 0],
        [128, 64, 32, 16],
        [255, 255, 255, 255],
    ];
    for cmyk in cases {
        let mut reference = [0.0f64; 3];
        transform.transform_pixels(slice::from_ref(&cmyk), slice::from_mut(&mut reference));

        let device = cmyk.map(|v| f64::from(v) / 255.0);
        let mut lab = [0.0; 3];
        ours.transform_general(&device, &mut lab);
        assert!(
            (lab[0] - reference[0]).abs() < 0.5,
            "CMYK {:?}: L {} vs lcms2 {}",
            cmyk,
            lab[0],
            reference[0]
        );
        assert!(lab[1].abs() < 0.5 && lab[2].abs() < 0.5, "CMYK {:?}: {:?}", cmyk, lab);
    }
    Ok(())
}

#[test]
fn test_gray_fixture_loads_in_lcms() -> Result<()> {
    for pcs in [b"XYZ ", b"Lab "] {
        let bytes = gray_profile_bytes(pcs, 2.2);
        lcms2::Profile::new_icc(&bytes)?;
        parse(&bytes)?;
    }
    Ok(())
}
