//! Synthetic profile bytes
//!
//! Profiles are assembled in memory so the tests carry no binary corpus.
//! The parity tests get their reference profiles from lcms2 instead.

use std::sync::{Arc, OnceLock};

use oxicc_core::Profile;
use oxicc_core::icc::S15Fixed16;

/// D50-adapted sRGB colorants as published in sRGB IEC61966-2.1
pub const SRGB_COLORANTS: [[f64; 3]; 3] = [
    [0.4360747, 0.2225045, 0.0139322],
    [0.3850649, 0.7168786, 0.0971045],
    [0.1430804, 0.0606169, 0.7141733],
];

/// Header, tag directory and tag bodies
pub struct ProfileBytes {
    header: Vec<u8>,
    tags: Vec<([u8; 4], Vec<u8>)>,
}

impl ProfileBytes {
    /// Version 4.3 profile with a D50 illuminant
    pub fn new(class: &[u8; 4], space: &[u8; 4], pcs: &[u8; 4]) -> Self {
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

    pub fn version(mut self, major: u8, minor: u8) -> Self {
        self.header[8] = major;
        self.header[9] = minor << 4;
        self
    }

    pub fn tag(mut self, sig: &[u8; 4], body: Vec<u8>) -> Self {
        self.tags.push((*sig, body));
        self
    }

    pub fn build(self) -> Vec<u8> {
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

fn xyz_bytes(v: [f64; 3]) -> Vec<u8> {
    v.iter()
        .flat_map(|c| S15Fixed16::encode(*c).to_be_bytes())
        .collect()
}

pub fn xyz_tag(v: [f64; 3]) -> Vec<u8> {
    let mut body = b"XYZ \0\0\0\0".to_vec();
    body.extend_from_slice(&xyz_bytes(v));
    body
}

pub fn text_tag(text: &str) -> Vec<u8> {
    let mut body = b"text\0\0\0\0".to_vec();
    body.extend_from_slice(text.as_bytes());
    body.push(0);
    body
}

/// `curv` with a single u8Fixed8 gamma
pub fn gamma_tag(gamma: f64) -> Vec<u8> {
    let mut body = b"curv\0\0\0\0".to_vec();
    body.extend_from_slice(&1u32.to_be_bytes());
    body.extend_from_slice(&((gamma * 256.0).round() as u16).to_be_bytes());
    body
}

/// `para` type 3 with the sRGB constants
pub fn srgb_para_tag() -> Vec<u8> {
    let mut body = b"para\0\0\0\0".to_vec();
    body.extend_from_slice(&3u16.to_be_bytes());
    body.extend_from_slice(&[0, 0]);
    for p in [2.4, 1.0 / 1.055, 0.055 / 1.055, 1.0 / 12.92, 0.04045] {
        body.extend_from_slice(&S15Fixed16::encode(p).to_be_bytes());
    }
    body
}

/// Display class sRGB matrix/TRC profile
pub fn srgb_profile_bytes() -> Vec<u8> {
    let [r, g, b] = SRGB_COLORANTS;
    ProfileBytes::new(b"mntr", b"RGB ", b"XYZ ")
        .tag(b"desc", text_tag("sRGB IEC61966-2.1"))
        .tag(b"cprt", text_tag("No copyright, use freely"))
        .tag(b"wtpt", xyz_tag([0.9642, 1.0, 0.8249]))
        .tag(b"rXYZ", xyz_tag(r))
        .tag(b"gXYZ", xyz_tag(g))
        .tag(b"bXYZ", xyz_tag(b))
        .tag(b"rTRC", srgb_para_tag())
        .tag(b"gTRC", srgb_para_tag())
        .tag(b"bTRC", srgb_para_tag())
        .build()
}

/// One shared sRGB profile for tests that only read it
pub fn srgb_profile() -> Arc<Profile> {
    static SRGB: OnceLock<Arc<Profile>> = OnceLock::new();
    SRGB.get_or_init(|| {
        let profile = Profile::parse(&srgb_profile_bytes()).unwrap_or_else(|err| {
            panic!("synthetic sRGB profile does not parse: {err}");
        });
        Arc::new(profile)
    })
    .clone()
}

/// Gray profile with a gamma kTRC
pub fn gray_profile_bytes(pcs: &[u8; 4], gamma: f64) -> Vec<u8> {
    ProfileBytes::new(b"mntr", b"GRAY", pcs)
        .tag(b"wtpt", xyz_tag([0.9642, 1.0, 0.8249]))
        .tag(b"kTRC", gamma_tag(gamma))
        .build()
}

/// Output class CMYK/Lab v2 profile with mft2 tables
///
/// A2B0 prints neutral grays whose lightness falls with total ink; B2A0
/// puts equal ink on every channel for a given lightness.
pub fn cmyk_profile_bytes() -> Vec<u8> {
    let a2b = mft2_tag(4, 3, |p| {
        let l = 100.0 - 95.0 * p.iter().sum::<f64>() / 4.0;
        vec![l / 100.0 * 65280.0 / 65535.0, 128.0 * 256.0 / 65535.0, 128.0 * 256.0 / 65535.0]
    });
    let b2a = mft2_tag(3, 4, |p| vec![1.0 - p[0]; 4]);
    ProfileBytes::new(b"prtr", b"CMYK", b"Lab ")
        .version(2, 4)
        .tag(b"wtpt", xyz_tag([0.9642, 1.0, 0.8249]))
        .tag(b"A2B0", a2b)
        .tag(b"B2A0", b2a)
        .build()
}

/// mft2 with two-entry identity tables and a grid of 2 per input
///
/// `f` maps each grid corner (0 or 1 per input) to normalised outputs.
pub fn mft2_tag(inputs: usize, outputs: usize, f: impl Fn(&[f64]) -> Vec<f64>) -> Vec<u8> {
    let mut body = b"mft2\0\0\0\0".to_vec();
    body.extend_from_slice(&[inputs as u8, outputs as u8, 2, 0]);
    for i in 0..9 {
        let v = if i % 4 == 0 { 1.0 } else { 0.0 };
        body.extend_from_slice(&S15Fixed16::encode(v).to_be_bytes());
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
