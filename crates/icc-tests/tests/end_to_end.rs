//! Whole-engine scenarios: parse, classify, build pipelines, convert

use anyhow::Result;
use icc_tests::fixtures::{cmyk_profile_bytes, gray_profile_bytes, srgb_profile, srgb_profile_bytes};
use icc_tests::patterns::random_unit_pixels;
use oxicc_core::icc::tags::Interpolation;
use oxicc_core::{
    D50, Error, Profile, ProfileClass, RenderingIntent, Signature, TransformOptions, WellKnownProfile,
    Xyz,
};

#[test]
fn test_srgb_white_to_srgb() -> Result<()> {
    let profile = srgb_profile();
    assert_eq!(profile.well_known(), WellKnownProfile::Srgb);
    assert!(profile.is_matrix_shaper());
    assert_eq!(profile.device_class(), ProfileClass::Display);

    let pipeline = profile.to_srgb_pipeline(3, TransformOptions::default())?;
    let white = pipeline.transform([1.0, 1.0, 1.0]);
    for c in white {
        assert!((c - 1.0).abs() < 1e-3, "white -> {:?}", white);
    }
    let black = pipeline.transform([0.0, 0.0, 0.0]);
    assert!(black.iter().all(|c| c.abs() < 1e-6), "black -> {:?}", black);
    Ok(())
}

#[test]
fn test_srgb_to_srgb_is_near_identity() -> Result<()> {
    let pipeline = srgb_profile().to_srgb_pipeline(3, TransformOptions::default())?;
    let samples = random_unit_pixels(21, 1000, 3);
    let mut out = samples.clone();
    pipeline.apply_rgb_buffer(&mut out)?;
    let worst = samples
        .iter()
        .zip(&out)
        .map(|(a, b)| (a - b).abs())
        .fold(0.0, f64::max);
    assert!(worst < 2e-3, "max deviation {}", worst);
    Ok(())
}

#[test]
fn test_bulk_matches_single_pixel() -> Result<()> {
    let pipeline = srgb_profile().to_srgb_pipeline(3, TransformOptions::default())?;
    let samples = random_unit_pixels(8, 257, 3);
    let mut bulk = samples.clone();
    pipeline.apply_rgb_buffer(&mut bulk)?;
    for (px, out) in samples.chunks_exact(3).zip(bulk.chunks_exact(3)) {
        let single = pipeline.transform([px[0], px[1], px[2]]);
        for (s, b) in single.iter().zip(out) {
            assert!((s - b).abs() < 1e-12, "{:?} vs {:?}", single, out);
        }
    }
    Ok(())
}

#[test]
fn test_device_round_trip() -> Result<()> {
    let profile = srgb_profile();
    let to_pcs = profile.to_pcs_pipeline(3, TransformOptions::default())?;
    let to_device = profile.to_device_pipeline(3, TransformOptions::default())?;
    for px in random_unit_pixels(2, 200, 3).chunks_exact(3) {
        let back = to_device.transform(to_pcs.transform([px[0], px[1], px[2]]));
        for (a, b) in px.iter().zip(back) {
            assert!((a - b).abs() < 1e-6, "{:?} -> {:?}", px, back);
        }
    }
    Ok(())
}

#[test]
fn test_intents_agree_on_matrix_shaper() -> Result<()> {
    let profile = srgb_profile();
    let reference = profile
        .to_pcs_pipeline(3, TransformOptions::default())?
        .transform([0.2, 0.5, 0.8]);
    for intent in [RenderingIntent::RelativeColorimetric, RenderingIntent::Saturation] {
        let pcs = profile
            .to_pcs_pipeline(3, TransformOptions::new().with_intent(intent))?
            .transform([0.2, 0.5, 0.8]);
        assert_eq!(pcs, reference, "{:?}", intent);
    }
    Ok(())
}

#[test]
fn test_gray_profiles() -> Result<()> {
    for pcs in [b"XYZ ", b"Lab "] {
        let profile = Profile::parse(&gray_profile_bytes(pcs, 2.2))?;
        let to_srgb = profile.to_srgb_pipeline(1, TransformOptions::default())?;
        let mut rgb = [0.0; 3];
        to_srgb.transform_general(&[1.0], &mut rgb);
        assert!(rgb.iter().all(|c| (c - 1.0).abs() < 1e-3), "{:?}", rgb);

        to_srgb.transform_general(&[0.5], &mut rgb);
        assert!((rgb[0] - rgb[1]).abs() < 1e-3 && (rgb[1] - rgb[2]).abs() < 1e-3, "{:?}", rgb);

        let to_device = profile.to_device_pipeline(1, TransformOptions::default())?;
        let to_pcs = profile.to_pcs_pipeline(1, TransformOptions::default())?;
        let mut pcs_value = [0.0; 3];
        let mut gray = [0.0];
        to_pcs.transform_general(&[0.3], &mut pcs_value);
        to_device.transform_general(&pcs_value, &mut gray);
        assert!((gray[0] - 0.3).abs() < 1e-6, "gray round trip {:?}", gray);
    }
    Ok(())
}

#[test]
fn test_cmyk_profile() -> Result<()> {
    let profile = Profile::parse(&cmyk_profile_bytes())?;
    assert!(profile.is_lut_based());
    assert!(!profile.is_matrix_shaper());
    assert_eq!(profile.well_known(), WellKnownProfile::Unknown);

    let to_srgb = profile.to_srgb_pipeline(4, TransformOptions::default())?;
    let mut paper = [0.0; 3];
    to_srgb.transform_general(&[0.0; 4], &mut paper);
    assert!(paper.iter().all(|c| (c - 1.0).abs() < 2e-3), "paper {:?}", paper);

    // Interpolation choice only affects 3-input CLUTs
    let nlinear = TransformOptions::new().with_interpolation(Interpolation::NLinear);
    let mut other = [0.0; 3];
    profile
        .to_srgb_pipeline(4, nlinear)?
        .transform_general(&[0.0; 4], &mut other);
    assert_eq!(paper, other);

    let buffer = random_unit_pixels(4, 64, 4);
    let mut rgb = vec![0.0; 64 * 3];
    to_srgb.transform_buffer(&buffer, &mut rgb)?;
    assert!(rgb.iter().all(|c| (0.0..=1.0).contains(c)));
    Ok(())
}

#[test]
fn test_bpc_lifts_nothing_on_zero_black() -> Result<()> {
    let profile = srgb_profile();
    let plain = profile.to_pcs_pipeline(3, TransformOptions::default())?;
    let bpc = profile.to_pcs_pipeline(3, TransformOptions::default().with_bpc())?;
    let a = plain.transform([0.1, 0.2, 0.3]);
    let b = bpc.transform([0.1, 0.2, 0.3]);
    for (x, y) in a.iter().zip(b) {
        assert!((x - y).abs() < 1e-9, "{:?} vs {:?}", a, b);
    }
    Ok(())
}

#[test]
fn test_absolute_colorimetric_keeps_d50_white() -> Result<()> {
    // The fixture's media white is D50, so absolute equals relative
    let profile = srgb_profile();
    let options = TransformOptions::new().with_intent(RenderingIntent::AbsoluteColorimetric);
    let white = Xyz::from_array(profile.to_pcs_pipeline(3, options)?.transform([1.0; 3]));
    assert!(white.approx_eq(&D50, 1e-3), "{:?}", white);
    Ok(())
}

#[test]
fn test_wrong_channel_count() {
    let err = srgb_profile()
        .to_srgb_pipeline(4, TransformOptions::default())
        .unwrap_err();
    assert!(matches!(err, Error::Inconsistent(_)), "{}", err);
}

#[test]
fn test_tag_queries() -> Result<()> {
    let profile = Profile::parse(&srgb_profile_bytes())?;
    assert_eq!(profile.description(), Some("sRGB IEC61966-2.1"));
    assert_eq!(profile.copyright().as_deref(), Some("No copyright, use freely"));
    assert!(profile.has_tag(Signature::from_bytes(*b"rTRC")));
    assert!(profile.tag_signatures().count() >= 9);
    assert!(matches!(
        profile.tag(Signature::A2B0),
        Err(Error::NotFound(sig)) if sig == Signature::A2B0
    ));
    Ok(())
}
