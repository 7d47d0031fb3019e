//! Transform factory
//!
//! Builds device → PCS, PCS → device and device → sRGB pipelines for one
//! profile. A LUT tag serving the requested intent wins over matrix/TRC
//! tags. Pipelines always carry real PCS units at the connection space
//! (XYZ with white at Y = 1, Lab with L in 0..100).

use super::Profile;
use crate::color::Xyz;
use crate::color::srgb::pcs_to_linear_srgb_matrix;
use crate::error::{Error, Result};
use crate::icc::tags::{LutDirection, TagValue};
use crate::icc::{ColorSpace, RenderingIntent, Signature};
use crate::pipeline::{
    BlackPointCorrection, ChannelTransformer, PcsEncoding, PcsSpace, Pipeline, TransformOptions,
};

impl Profile {
    /// Device values to PCS
    ///
    /// With black point compensation the profile's black point is mapped
    /// to zero XYZ.
    pub fn to_pcs_pipeline(&self, channel_count: usize, options: TransformOptions) -> Result<Pipeline> {
        let span = tracing::trace_span!("to_pcs_pipeline", intent = ?options.intent, channel_count);
        let _enter = span.enter();
        self.check_channels(channel_count)?;

        let mut pipeline = self.device_to_pcs(channel_count, options)?;

        let mut xyz_stages = Vec::new();
        if options.intent == RenderingIntent::AbsoluteColorimetric {
            xyz_stages.push(ChannelTransformer::Matrix(self.absolute_scale()));
        }
        if let Some(bpc) = self.black_point_correction(options, LutDirection::AToB) {
            xyz_stages.push(ChannelTransformer::BlackPointCorrection(bpc));
        }
        append_in_xyz(&mut pipeline, self.pcs_space(), xyz_stages);

        finish(pipeline, channel_count, 3)
    }

    /// PCS values to device
    ///
    /// LUT profiles need a B2A tag; matrix/TRC profiles invert the
    /// colorant matrix and the TRCs.
    pub fn to_device_pipeline(&self, channel_count: usize, options: TransformOptions) -> Result<Pipeline> {
        let span = tracing::trace_span!("to_device_pipeline", intent = ?options.intent, channel_count);
        let _enter = span.enter();
        self.check_channels(channel_count)?;

        let mut xyz_stages = Vec::new();
        if let Some(bpc) = self.black_point_correction(options, LutDirection::BToA) {
            xyz_stages.push(ChannelTransformer::BlackPointCorrection(bpc));
        }
        if options.intent == RenderingIntent::AbsoluteColorimetric {
            let inverse = self
                .absolute_scale()
                .inverse()
                .ok_or_else(|| Error::NoInverseAvailable("media white is singular".to_string()))?;
            xyz_stages.push(ChannelTransformer::Matrix(inverse));
        }

        let mut pipeline = Pipeline::new();
        if let Some(sig) = self.b2a_for_intent(options.intent) {
            tracing::debug!(%sig, "PCS to device through LUT");
            append_in_xyz(&mut pipeline, self.pcs_space(), xyz_stages);
            self.append_b2a(&mut pipeline, sig, channel_count, options)?;
        } else if self.a2b_for_intent(options.intent).is_some() {
            return Err(Error::NoInverseAvailable(format!(
                "LUT profile has no B2A tag for {:?}",
                options.intent
            )));
        } else {
            self.append_inverse_shaper(&mut pipeline, xyz_stages)?;
        }

        if options.clamp_output {
            pipeline.append(ChannelTransformer::Clamp {
                channels: channel_count,
            });
        }
        finish(pipeline, 3, channel_count)
    }

    /// Device values to companded sRGB
    ///
    /// The PCS is Bradford adapted from D50 to D65 and mapped with the
    /// IEC 61966-2-1 matrix, then either companded or gamut mapped.
    pub fn to_srgb_pipeline(&self, channel_count: usize, options: TransformOptions) -> Result<Pipeline> {
        let mut pipeline = self.to_pcs_pipeline(channel_count, options)?;

        let span = tracing::trace_span!("to_srgb_pipeline", gamut_mapping = options.gamut_mapping);
        let _enter = span.enter();

        if self.pcs_space() == PcsSpace::Lab {
            pipeline.append(ChannelTransformer::LabToXyz);
        }
        if options.gamut_mapping {
            pipeline.append(ChannelTransformer::GamutMappedSrgb);
        } else {
            pipeline.append(ChannelTransformer::Matrix(pcs_to_linear_srgb_matrix()));
            pipeline.append(ChannelTransformer::SrgbCompanding {
                clamp: options.clamp_output,
            });
        }
        finish(pipeline, channel_count, 3)
    }

    pub(crate) fn pcs_space(&self) -> PcsSpace {
        match self.pcs() {
            ColorSpace::Lab => PcsSpace::Lab,
            _ => PcsSpace::Xyz,
        }
    }

    /// Strategy selection for the device side, without PCS adjustments
    fn device_to_pcs(&self, channel_count: usize, options: TransformOptions) -> Result<Pipeline> {
        if let Some(sig) = self.a2b_for_intent(options.intent) {
            tracing::debug!(%sig, "Device to PCS through LUT");
            return self.a2b_pipeline(sig, channel_count, options);
        }

        let mut pipeline = Pipeline::new();
        match self.color_space() {
            ColorSpace::Rgb => {
                tracing::debug!("Device to PCS through matrix/TRC");
                pipeline.append(ChannelTransformer::curves(self.rgb_trcs()?));
                pipeline.append(ChannelTransformer::Matrix(self.colorant_matrix()?));
                if self.pcs_space() == PcsSpace::Lab {
                    pipeline.append(ChannelTransformer::XyzToLab);
                }
            }
            ColorSpace::Gray => {
                tracing::debug!("Device to PCS through gray TRC");
                pipeline.append(ChannelTransformer::GrayToPcs {
                    curve: self.gray_trc()?,
                    pcs: self.pcs_space(),
                });
            }
            _ => return Err(Error::NotFound(Signature::A2B0)),
        }
        Ok(pipeline)
    }

    fn a2b_pipeline(&self, sig: Signature, channel_count: usize, options: TransformOptions) -> Result<Pipeline> {
        let tag = self.tag(sig)?;
        let pcs_is_lab = self.pcs_space() == PcsSpace::Lab;
        let (mut pipeline, encoding) = match &*tag {
            TagValue::Lut(lut) => {
                check_lut_shape(sig, lut.inputs(), lut.outputs(), channel_count, 3)?;
                let input_is_xyz = self.color_space() == ColorSpace::Xyz;
                (
                    lut.to_pipeline(input_is_xyz, options.interpolation),
                    lut.pcs_encoding(pcs_is_lab),
                )
            }
            TagValue::Modular(m) if m.direction == LutDirection::AToB => {
                check_lut_shape(sig, m.inputs, m.outputs, channel_count, 3)?;
                (m.to_pipeline(options.interpolation), modular_encoding(pcs_is_lab))
            }
            _ => {
                return Err(Error::inconsistent(format!(
                    "{} is not a device to PCS table",
                    sig
                )));
            }
        };
        pipeline.append(ChannelTransformer::PcsDecode(encoding));
        Ok(pipeline)
    }

    fn append_b2a(
        &self,
        pipeline: &mut Pipeline,
        sig: Signature,
        channel_count: usize,
        options: TransformOptions,
    ) -> Result<()> {
        let tag = self.tag(sig)?;
        let pcs_is_lab = self.pcs_space() == PcsSpace::Lab;
        match &*tag {
            TagValue::Lut(lut) => {
                check_lut_shape(sig, lut.inputs(), lut.outputs(), 3, channel_count)?;
                pipeline.append(ChannelTransformer::PcsEncode(lut.pcs_encoding(pcs_is_lab)));
                let table = lut.to_pipeline(!pcs_is_lab, options.interpolation);
                pipeline.append(ChannelTransformer::Pipeline(table));
            }
            TagValue::Modular(m) if m.direction == LutDirection::BToA => {
                check_lut_shape(sig, m.inputs, m.outputs, 3, channel_count)?;
                pipeline.append(ChannelTransformer::PcsEncode(modular_encoding(pcs_is_lab)));
                pipeline.append(ChannelTransformer::Pipeline(m.to_pipeline(options.interpolation)));
            }
            _ => {
                return Err(Error::inconsistent(format!(
                    "{} is not a PCS to device table",
                    sig
                )));
            }
        }
        Ok(())
    }

    /// PCS to device for matrix/TRC and gray profiles
    fn append_inverse_shaper(&self, pipeline: &mut Pipeline, xyz_stages: Vec<ChannelTransformer>) -> Result<()> {
        let pcs = self.pcs_space();
        match self.color_space() {
            ColorSpace::Rgb => {
                let inverse = self.colorant_matrix()?.inverse().ok_or_else(|| {
                    Error::NoInverseAvailable("colorant matrix is singular".to_string())
                })?;
                tracing::debug!("PCS to device through inverse matrix/TRC");
                if pcs == PcsSpace::Lab {
                    pipeline.append(ChannelTransformer::LabToXyz);
                }
                append_in_xyz(pipeline, PcsSpace::Xyz, xyz_stages);
                pipeline.append(ChannelTransformer::Matrix(inverse));
                pipeline.append(ChannelTransformer::InverseCurves(self.rgb_trcs()?));
                Ok(())
            }
            ColorSpace::Gray => {
                tracing::debug!("PCS to device through inverse gray TRC");
                append_in_xyz(pipeline, pcs, xyz_stages);
                pipeline.append(ChannelTransformer::PcsToGray {
                    curve: self.gray_trc()?,
                    pcs,
                });
                Ok(())
            }
            other => Err(Error::NoInverseAvailable(format!(
                "no B2A tag and no shaper inverse for {:?}",
                other
            ))),
        }
    }

    /// Black point correction for one direction, when requested and defined
    ///
    /// Absolute colorimetric never compensates.
    fn black_point_correction(
        &self,
        options: TransformOptions,
        direction: LutDirection,
    ) -> Option<BlackPointCorrection> {
        if !options.black_point_compensation {
            return None;
        }
        if options.intent == RenderingIntent::AbsoluteColorimetric {
            tracing::debug!("Black point compensation skipped for absolute colorimetric");
            return None;
        }
        let black = self.black_point(options.intent);
        let correction = match direction {
            LutDirection::AToB => BlackPointCorrection::new(black, Xyz::ZERO),
            LutDirection::BToA => BlackPointCorrection::new(Xyz::ZERO, black),
        };
        if correction.is_none() {
            tracing::debug!(?black, "Black point compensation undefined, skipped");
        }
        correction
    }
}

/// Append stages that work in XYZ to a pipeline carrying `pcs` values
fn append_in_xyz(pipeline: &mut Pipeline, pcs: PcsSpace, stages: Vec<ChannelTransformer>) {
    let stages: Vec<_> = stages.into_iter().filter(|s| !s.is_identity()).collect();
    if stages.is_empty() {
        return;
    }
    let lab = pcs == PcsSpace::Lab;
    if lab {
        pipeline.append(ChannelTransformer::LabToXyz);
    }
    for stage in stages {
        pipeline.append(stage);
    }
    if lab {
        pipeline.append(ChannelTransformer::XyzToLab);
    }
}

fn modular_encoding(pcs_is_lab: bool) -> PcsEncoding {
    if pcs_is_lab {
        PcsEncoding::LabV4
    } else {
        PcsEncoding::Xyz
    }
}

fn check_lut_shape(sig: Signature, inputs: usize, outputs: usize, want_in: usize, want_out: usize) -> Result<()> {
    if inputs != want_in || outputs != want_out {
        return Err(Error::inconsistent(format!(
            "{} maps {} to {} channels, need {} to {}",
            sig, inputs, outputs, want_in, want_out
        )));
    }
    Ok(())
}

fn finish(pipeline: Pipeline, inputs: usize, outputs: usize) -> Result<Pipeline> {
    if !pipeline.suitable_for(inputs, outputs) {
        return Err(Error::inconsistent(format!(
            "pipeline {:?} does not map {} to {} channels",
            pipeline.signature(),
            inputs,
            outputs
        )));
    }
    tracing::debug!(stages = pipeline.len(), inputs, outputs, "Built pipeline");
    Ok(pipeline)
}

#[cfg(test)]
mod tests {
    use super::super::test_profiles::*;
    use super::*;
    use crate::color::{D50, Lab};
    use crate::icc::tags::Interpolation;

    fn srgb() -> Profile {
        Profile::parse(&srgb_profile()).unwrap()
    }

    #[test]
    fn test_srgb_white_to_srgb() {
        let pipeline = srgb().to_srgb_pipeline(3, TransformOptions::default()).unwrap();
        let white = pipeline.transform([1.0, 1.0, 1.0]);
        for c in white {
            assert!((c - 1.0).abs() < 1e-3, "white {:?}", white);
        }
        let black = pipeline.transform([0.0, 0.0, 0.0]);
        for c in black {
            assert!(c.abs() < 1e-6, "black {:?}", black);
        }
        let gray = pipeline.transform([0.5, 0.5, 0.5]);
        for c in gray {
            assert!((c - 0.5).abs() < 2e-3, "gray {:?}", gray);
        }
    }

    #[test]
    fn test_matrices_fuse_to_srgb() {
        let pipeline = srgb().to_srgb_pipeline(3, TransformOptions::default()).unwrap();
        // Curves, one fused matrix, companding
        assert_eq!(pipeline.len(), 3, "{:?}", pipeline.stages());
    }

    #[test]
    fn test_lab_pcs_shaper_skips_lab_round_trip() {
        let data = ProfileBuilder::new(b"mntr", b"RGB ", b"Lab ")
            .tag(b"rXYZ", xyz_tag([0.4360747, 0.2225045, 0.0139322]))
            .tag(b"gXYZ", xyz_tag([0.3850649, 0.7168786, 0.0971045]))
            .tag(b"bXYZ", xyz_tag([0.1430804, 0.0606169, 0.7141733]))
            .tag(b"rTRC", srgb_para_tag())
            .tag(b"gTRC", srgb_para_tag())
            .tag(b"bTRC", srgb_para_tag())
            .build();
        let profile = Profile::parse(&data).unwrap();
        let pipeline = profile.to_srgb_pipeline(3, TransformOptions::default()).unwrap();
        assert!(
            !pipeline
                .stages()
                .iter()
                .any(|s| matches!(s, ChannelTransformer::XyzToLab | ChannelTransformer::LabToXyz)),
            "{:?}",
            pipeline.stages()
        );
        assert_eq!(pipeline.len(), 3);

        let xyz_pcs = srgb().to_srgb_pipeline(3, TransformOptions::default()).unwrap();
        for rgb in [[0.2, 0.5, 0.8], [1.0, 1.0, 1.0], [0.0, 0.3, 0.0]] {
            let (a, b) = (pipeline.transform(rgb), xyz_pcs.transform(rgb));
            assert!(a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-12), "{:?} vs {:?}", a, b);
        }
    }

    #[test]
    fn test_to_pcs_white_is_d50() {
        let pipeline = srgb().to_pcs_pipeline(3, TransformOptions::default()).unwrap();
        let white = Xyz::from_array(pipeline.transform([1.0, 1.0, 1.0]));
        assert!(white.approx_eq(&D50, 1e-3), "white {:?}", white);
    }

    #[test]
    fn test_device_roundtrip() {
        let profile = srgb();
        let to_pcs = profile.to_pcs_pipeline(3, TransformOptions::default()).unwrap();
        let to_device = profile.to_device_pipeline(3, TransformOptions::default()).unwrap();
        for rgb in [[0.2, 0.5, 0.8], [0.9, 0.1, 0.4], [0.0, 1.0, 0.5]] {
            let back = to_device.transform(to_pcs.transform(rgb));
            for (a, b) in rgb.iter().zip(back) {
                assert!((a - b).abs() < 1e-6, "{:?} -> {:?}", rgb, back);
            }
        }
    }

    #[test]
    fn test_channel_mismatch() {
        let profile = srgb();
        assert!(matches!(
            profile.to_pcs_pipeline(4, TransformOptions::default()),
            Err(Error::Inconsistent(_))
        ));
        assert!(matches!(
            profile.to_device_pipeline(1, TransformOptions::default()),
            Err(Error::Inconsistent(_))
        ));
    }

    #[test]
    fn test_absolute_colorimetric_scales_by_media_white() {
        let wtpt = [0.95, 1.0, 1.09];
        let data = ProfileBuilder::new(b"mntr", b"RGB ", b"XYZ ")
            .tag(b"wtpt", xyz_tag(wtpt))
            .tag(b"rXYZ", xyz_tag([0.4360747, 0.2225045, 0.0139322]))
            .tag(b"gXYZ", xyz_tag([0.3850649, 0.7168786, 0.0971045]))
            .tag(b"bXYZ", xyz_tag([0.1430804, 0.0606169, 0.7141733]))
            .tag(b"rTRC", gamma_tag(2.2))
            .tag(b"gTRC", gamma_tag(2.2))
            .tag(b"bTRC", gamma_tag(2.2))
            .build();
        let profile = Profile::parse(&data).unwrap();
        let options = TransformOptions::new().with_intent(RenderingIntent::AbsoluteColorimetric);

        let to_pcs = profile.to_pcs_pipeline(3, options).unwrap();
        let white = to_pcs.transform([1.0, 1.0, 1.0]);
        for (a, b) in white.iter().zip(wtpt) {
            assert!((a - b).abs() < 2e-3, "white {:?}", white);
        }

        let to_device = profile.to_device_pipeline(3, options).unwrap();
        let back = to_device.transform(white);
        for c in back {
            assert!((c - 1.0).abs() < 1e-4, "back {:?}", back);
        }
    }

    #[test]
    fn test_gray_xyz() {
        let profile = Profile::parse(&gray_profile(b"XYZ ")).unwrap();
        let to_pcs = profile.to_pcs_pipeline(1, TransformOptions::default()).unwrap();
        let mut out = [0.0; 3];
        to_pcs.transform_general(&[1.0], &mut out);
        assert!(Xyz::from_array(out).approx_eq(&D50, 1e-9), "{:?}", out);

        let to_srgb = profile.to_srgb_pipeline(1, TransformOptions::default()).unwrap();
        to_srgb.transform_general(&[1.0], &mut out);
        for c in out {
            assert!((c - 1.0).abs() < 1e-3, "gray white {:?}", out);
        }

        let to_device = profile.to_device_pipeline(1, TransformOptions::default()).unwrap();
        let mut pcs = [0.0; 3];
        let mut gray = [0.0; 1];
        to_pcs.transform_general(&[0.4], &mut pcs);
        to_device.transform_general(&pcs, &mut gray);
        assert!((gray[0] - 0.4).abs() < 1e-6, "gray {}", gray[0]);
    }

    #[test]
    fn test_gray_lab() {
        let profile = Profile::parse(&gray_profile(b"Lab ")).unwrap();
        let to_pcs = profile.to_pcs_pipeline(1, TransformOptions::default()).unwrap();
        let mut out = [0.0; 3];
        to_pcs.transform_general(&[1.0], &mut out);
        assert!((out[0] - 100.0).abs() < 1e-9 && out[1] == 0.0 && out[2] == 0.0, "{:?}", out);

        let to_device = profile.to_device_pipeline(1, TransformOptions::default()).unwrap();
        let mut gray = [0.0; 1];
        to_pcs.transform_general(&[0.6], &mut out);
        to_device.transform_general(&out, &mut gray);
        assert!((gray[0] - 0.6).abs() < 1e-6, "gray {}", gray[0]);
    }

    #[test]
    fn test_cmyk_lut_to_pcs() {
        let profile = Profile::parse(&cmyk_profile(false)).unwrap();
        let to_pcs = profile.to_pcs_pipeline(4, TransformOptions::default()).unwrap();
        let mut lab = [0.0; 3];
        to_pcs.transform_general(&[0.0, 0.0, 0.0, 0.0], &mut lab);
        assert!((lab[0] - 100.0).abs() < 1e-3, "paper {:?}", lab);
        assert!(lab[1].abs() < 1e-3 && lab[2].abs() < 1e-3, "paper {:?}", lab);

        to_pcs.transform_general(&[0.5, 0.5, 0.5, 0.5], &mut lab);
        let expected = printer_lightness(&[0.5; 4]);
        assert!((lab[0] - expected).abs() < 1e-2, "mid {:?} want {}", lab, expected);

        let to_srgb = profile.to_srgb_pipeline(4, TransformOptions::default()).unwrap();
        let mut rgb = [0.0; 3];
        to_srgb.transform_general(&[0.0; 4], &mut rgb);
        for c in rgb {
            assert!((c - 1.0).abs() < 1e-2, "paper rgb {:?}", rgb);
        }
    }

    #[test]
    fn test_cmyk_without_b2a_has_no_inverse() {
        let profile = Profile::parse(&cmyk_profile(false)).unwrap();
        assert!(matches!(
            profile.to_device_pipeline(4, TransformOptions::default()),
            Err(Error::NoInverseAvailable(_))
        ));
    }

    #[test]
    fn test_cmyk_b2a() {
        let profile = Profile::parse(&cmyk_profile(true)).unwrap();
        let to_device = profile.to_device_pipeline(4, TransformOptions::default()).unwrap();
        let mut cmyk = [0.0; 4];
        to_device.transform_general(&[0.0, 0.0, 0.0], &mut cmyk);
        assert_eq!(cmyk, [1.0; 4]);
        to_device.transform_general(&[100.0, 0.0, 0.0], &mut cmyk);
        for c in cmyk {
            assert!(c.abs() < 1e-2, "paper ink {:?}", cmyk);
        }
    }

    #[test]
    fn test_cmyk_wrong_channel_count() {
        let profile = Profile::parse(&cmyk_profile(false)).unwrap();
        assert!(matches!(
            profile.to_srgb_pipeline(3, TransformOptions::default()),
            Err(Error::Inconsistent(_))
        ));
    }

    #[test]
    fn test_lut_takes_precedence_over_matrix() {
        let data = ProfileBuilder::new(b"mntr", b"RGB ", b"XYZ ")
            .tag(b"rXYZ", xyz_tag([0.4360747, 0.2225045, 0.0139322]))
            .tag(b"gXYZ", xyz_tag([0.3850649, 0.7168786, 0.0971045]))
            .tag(b"bXYZ", xyz_tag([0.1430804, 0.0606169, 0.7141733]))
            .tag(b"rTRC", srgb_para_tag())
            .tag(b"gTRC", srgb_para_tag())
            .tag(b"bTRC", srgb_para_tag())
            .tag(b"A2B0", identity_mab(3, 3))
            .build();
        let profile = Profile::parse(&data).unwrap();
        let to_pcs = profile.to_pcs_pipeline(3, TransformOptions::default()).unwrap();
        // Identity table, so only the u1Fixed15 decode remains
        let out = to_pcs.transform([1.0, 1.0, 1.0]);
        assert!((out[1] - 65535.0 / 32768.0).abs() < 1e-9, "{:?}", out);
        assert!(matches!(to_pcs.stages(), [ChannelTransformer::PcsDecode(PcsEncoding::Xyz)]));
    }

    #[test]
    fn test_lut_shape_mismatch() {
        let data = ProfileBuilder::new(b"mntr", b"RGB ", b"XYZ ")
            .tag(b"A2B0", identity_mab(4, 4))
            .build();
        let profile = Profile::parse(&data).unwrap();
        assert!(matches!(
            profile.to_pcs_pipeline(3, TransformOptions::default()),
            Err(Error::Inconsistent(_))
        ));
    }

    #[test]
    fn test_missing_tags_not_found() {
        let data = ProfileBuilder::new(b"mntr", b"RGB ", b"XYZ ")
            .tag(b"rXYZ", xyz_tag([0.4360747, 0.2225045, 0.0139322]))
            .build();
        let profile = Profile::parse(&data).unwrap();
        assert!(matches!(
            profile.to_pcs_pipeline(3, TransformOptions::default()),
            Err(Error::NotFound(_))
        ));

        let cmyk = Profile::parse(&ProfileBuilder::new(b"prtr", b"CMYK", b"Lab ").build()).unwrap();
        assert_eq!(
            cmyk.to_pcs_pipeline(4, TransformOptions::default()).err(),
            Some(Error::NotFound(Signature::A2B0))
        );
    }

    #[test]
    fn test_gamut_mapped_output_in_range() {
        let profile = Profile::parse(&cmyk_profile(false)).unwrap();
        let options = TransformOptions::new().with_gamut_mapping();
        let to_srgb = profile.to_srgb_pipeline(4, options).unwrap();
        let mut rgb = [0.0; 3];
        for k in [0.0, 0.3, 0.7, 1.0] {
            to_srgb.transform_general(&[0.2, 0.4, 0.6, k], &mut rgb);
            assert!(rgb.iter().all(|c| (-1e-9..=1.0 + 1e-9).contains(c)), "{:?}", rgb);
        }
    }

    #[test]
    fn test_bpc_maps_black_to_zero() {
        // Sampled TRC that never reaches zero
        let mut trc = b"curv\0\0\0\0".to_vec();
        trc.extend_from_slice(&2u32.to_be_bytes());
        trc.extend_from_slice(&655u16.to_be_bytes());
        trc.extend_from_slice(&65535u16.to_be_bytes());
        let data = ProfileBuilder::new(b"mntr", b"RGB ", b"XYZ ")
            .tag(b"rXYZ", xyz_tag([0.4360747, 0.2225045, 0.0139322]))
            .tag(b"gXYZ", xyz_tag([0.3850649, 0.7168786, 0.0971045]))
            .tag(b"bXYZ", xyz_tag([0.1430804, 0.0606169, 0.7141733]))
            .tag(b"rTRC", trc.clone())
            .tag(b"gTRC", trc.clone())
            .tag(b"bTRC", trc)
            .build();
        let profile = Profile::parse(&data).unwrap();

        let plain = profile.to_pcs_pipeline(3, TransformOptions::default()).unwrap();
        assert!(plain.transform([0.0; 3])[1] > 5e-3);

        let options = TransformOptions::new()
            .with_intent(RenderingIntent::RelativeColorimetric)
            .with_bpc();
        let compensated = profile.to_pcs_pipeline(3, options).unwrap();
        let black = compensated.transform([0.0; 3]);
        for c in black {
            assert!(c.abs() < 1e-4, "black {:?}", black);
        }
        let white = Xyz::from_array(compensated.transform([1.0; 3]));
        assert!(white.approx_eq(&D50, 2e-3), "white {:?}", white);
    }

    #[test]
    fn test_interpolation_choice_agrees() {
        let profile = Profile::parse(&cmyk_profile(true)).unwrap();
        let tetra = profile.to_device_pipeline(4, TransformOptions::default()).unwrap();
        let nlinear = profile
            .to_device_pipeline(4, TransformOptions::new().with_interpolation(Interpolation::NLinear))
            .unwrap();
        let lab = Lab::new(40.0, 0.0, 0.0).to_array();
        let (mut a, mut b) = ([0.0; 4], [0.0; 4]);
        tetra.transform_general(&lab, &mut a);
        nlinear.transform_general(&lab, &mut b);
        for (x, y) in a.iter().zip(b) {
            assert!((x - y).abs() < 1e-9, "{:?} vs {:?}", a, b);
        }
    }
}
