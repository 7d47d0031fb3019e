//! Byte builders for synthetic profiles used by the unit tests

use crate::icc::types::S15Fixed16;

/// Assembles a header, tag directory and tag bodies
pub(crate) struct ProfileBuilder {
    header: Vec<u8>,
    tags: Vec<([u8; 4], Vec<u8>)>,
}

impl ProfileBuilder {
    /// Version 4.3 profile with a D50 illuminant and perceptual intent
    pub(crate) fn new(class: &[u8; 4], space: &[u8; 4], pcs: &[u8; 4]) -> Self {
        let mut header = vec![0u8; 128];
        header[8] = 4;
        header[9] = 0x30;
        header[12..16].copy_from_slice(class);
        header[16..20].copy_from_slice(space);
        header[20..24].copy_from_slice(pcs);
        header[36..40].copy_from_slice(b"acsp");
        header[68..80].copy_from_slice(&xyz_bytes([0.9642, 1.0, 0.8249]));
        Self {
            header,
            tags: Vec::new(),
        }
    }

    pub(crate) fn version(mut self, major: u8, minor: u8) -> Self {
        self.header[8] = major;
        self.header[9] = minor << 4;
        self
    }

    pub(crate) fn tag(mut self, sig: &[u8; 4], body: Vec<u8>) -> Self {
        self.tags.push((*sig, body));
        self
    }

    pub(crate) fn build(self) -> Vec<u8> {
        let mut data = self.header;
        data.extend_from_slice(&(self.tags.len() as u32).to_be_bytes());
        let mut offset = 132 + self.tags.len() * 12;
        let mut bodies = Vec::new();
        for (sig, body) in &self.tags {
            let padded = body.len().next_multiple_of(4);
            data.extend_from_slice(sig);
            data.extend_from_slice(&(offset as u32).to_be_bytes());
            data.extend_from_slice(&(body.len() as u32).to_be_bytes());
            bodies.extend_from_slice(body);
            bodies.resize(bodies.len() + padded - body.len(), 0);
            offset += padded;
        }
        data.extend_from_slice(&bodies);
        let size = data.len() as u32;
        data[0..4].copy_from_slice(&size.to_be_bytes());
        data
    }
}

pub(crate) fn s15(v: f64) -> [u8; 4] {
    S15Fixed16::encode(v).to_be_bytes()
}

fn xyz_bytes(v: [f64; 3]) -> Vec<u8> {
    v.iter().flat_map(|c| s15(*c)).collect()
}

pub(crate) fn xyz_tag(v: [f64; 3]) -> Vec<u8> {
    let mut body = b"XYZ \0\0\0\0".to_vec();
    body.extend_from_slice(&xyz_bytes(v));
    body
}

pub(crate) fn text_tag(text: &str) -> Vec<u8> {
    let mut body = b"text\0\0\0\0".to_vec();
    body.extend_from_slice(text.as_bytes());
    body.push(0);
    body
}

/// `curv` with a single gamma entry
pub(crate) fn gamma_tag(gamma: f64) -> Vec<u8> {
    let mut body = b"curv\0\0\0\0".to_vec();
    body.extend_from_slice(&1u32.to_be_bytes());
    body.extend_from_slice(&((gamma * 256.0).round() as u16).to_be_bytes());
    body
}

/// `curv` with no entries
pub(crate) fn identity_curv() -> Vec<u8> {
    let mut body = b"curv\0\0\0\0".to_vec();
    body.extend_from_slice(&0u32.to_be_bytes());
    body
}

/// `para` type 3 with the sRGB constants
pub(crate) fn srgb_para_tag() -> Vec<u8> {
    let mut body = b"para\0\0\0\0".to_vec();
    body.extend_from_slice(&3u16.to_be_bytes());
    body.extend_from_slice(&[0, 0]);
    for p in [2.4, 1.0 / 1.055, 0.055 / 1.055, 1.0 / 12.92, 0.04045] {
        body.extend_from_slice(&s15(p));
    }
    body
}

/// Display class RGB matrix/TRC profile with the D50-adapted sRGB colorants
pub(crate) fn srgb_profile() -> Vec<u8> {
    ProfileBuilder::new(b"mntr", b"RGB ", b"XYZ ")
        .tag(b"desc", text_tag("sRGB IEC61966-2.1"))
        .tag(b"wtpt", xyz_tag([0.9642, 1.0, 0.8249]))
        .tag(b"rXYZ", xyz_tag([0.4360747, 0.2225045, 0.0139322]))
        .tag(b"gXYZ", xyz_tag([0.3850649, 0.7168786, 0.0971045]))
        .tag(b"bXYZ", xyz_tag([0.1430804, 0.0606169, 0.7141733]))
        .tag(b"rTRC", srgb_para_tag())
        .tag(b"gTRC", srgb_para_tag())
        .tag(b"bTRC", srgb_para_tag())
        .build()
}

/// Gray profile with a gamma 2.2 kTRC
pub(crate) fn gray_profile(pcs: &[u8; 4]) -> Vec<u8> {
    ProfileBuilder::new(b"mntr", b"GRAY", pcs)
        .tag(b"wtpt", xyz_tag([0.9642, 1.0, 0.8249]))
        .tag(b"kTRC", gamma_tag(2.2))
        .build()
}

/// mAB/mBA with identity B curves only
pub(crate) fn identity_mab(inputs: u8, outputs: u8) -> Vec<u8> {
    let mut body = b"mAB \0\0\0\0".to_vec();
    body.extend_from_slice(&[inputs, outputs, 0, 0]);
    body.extend_from_slice(&32u32.to_be_bytes());
    body.extend_from_slice(&[0u8; 16]);
    for _ in 0..outputs {
        body.extend_from_slice(&identity_curv());
    }
    body
}

/// mft2 with two-entry identity tables and a grid of 2 per input
///
/// `f` maps each grid corner (0 or 1 per input) to normalised outputs.
pub(crate) fn mft2_tag(inputs: usize, outputs: usize, f: impl Fn(&[f64]) -> Vec<f64>) -> Vec<u8> {
    let mut body = b"mft2\0\0\0\0".to_vec();
    body.extend_from_slice(&[inputs as u8, outputs as u8, 2, 0]);
    for i in 0..9 {
        body.extend_from_slice(&s15(if i % 4 == 0 { 1.0 } else { 0.0 }));
    }
    body.extend_from_slice(&2u16.to_be_bytes());
    body.extend_from_slice(&2u16.to_be_bytes());
    let identity_table = |body: &mut Vec<u8>| {
        body.extend_from_slice(&0u16.to_be_bytes());
        body.extend_from_slice(&65535u16.to_be_bytes());
    };
    for _ in 0..inputs {
        identity_table(&mut body);
    }
    // Last input varies fastest
    for corner in 0..(1usize << inputs) {
        let point: Vec<f64> = (0..inputs)
            .map(|d| ((corner >> (inputs - 1 - d)) & 1) as f64)
            .collect();
        for v in f(&point) {
            let q = (v.clamp(0.0, 1.0) * 65535.0).round() as u16;
            body.extend_from_slice(&q.to_be_bytes());
        }
    }
    for _ in 0..outputs {
        identity_table(&mut body);
    }
    body
}

/// Lab as the legacy 16-bit encoding used by mft2
pub(crate) fn lab_v2(l: f64, a: f64, b: f64) -> Vec<f64> {
    vec![
        l / 100.0 * 65280.0 / 65535.0,
        (a + 128.0) * 256.0 / 65535.0,
        (b + 128.0) * 256.0 / 65535.0,
    ]
}

/// Lightness of the synthetic CMYK printer for a device value
pub(crate) fn printer_lightness(cmyk: &[f64]) -> f64 {
    100.0 - 95.0 * cmyk.iter().sum::<f64>() / 4.0
}

/// Output class CMYK/Lab profile whose A2B0 prints neutral grays darkening
/// with total ink, optionally with a B2A0 that inverts lightness into
/// equal ink on every channel
pub(crate) fn cmyk_profile(with_b2a: bool) -> Vec<u8> {
    let a2b = mft2_tag(4, 3, |p| lab_v2(printer_lightness(p), 0.0, 0.0));
    let mut builder = ProfileBuilder::new(b"prtr", b"CMYK", b"Lab ")
        .version(2, 4)
        .tag(b"wtpt", xyz_tag([0.9642, 1.0, 0.8249]))
        .tag(b"A2B0", a2b);
    if with_b2a {
        // Input L is encoded, so corner L = 0 is black
        let b2a = mft2_tag(3, 4, |p| vec![1.0 - p[0]; 4]);
        builder = builder.tag(b"B2A0", b2a);
    }
    builder.build()
}
