// Wire layout: i32 width, i32 height, then width * height RGBA pixels,
// one little-endian f32 per channel, row-major. No magic, no version.

use std::{fs, io, path::Path};

use nom::{
    error::ParseError,
    number::complete::{le_f32, le_i32},
    Finish, IResult,
};

pub const CHANNELS: usize = 4;
pub const PIXEL_LEN: usize = CHANNELS * std::mem::size_of::<f32>();

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Header {
    pub width: i32,
    pub height: i32,
}

impl Header {
    pub const LEN: usize = 8;

    pub fn payload_len(&self) -> Result<u64, DecodeError> {
        if self.width < 0 || self.height < 0 {
            return Err(DecodeError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }

        (self.width as u64)
            .checked_mul(self.height as u64)
            .and_then(|pixels| pixels.checked_mul(PIXEL_LEN as u64))
            .ok_or(DecodeError::InvalidDimensions {
                width: self.width,
                height: self.height,
            })
    }
}

#[derive(thiserror::Error, Debug)]
pub enum DecodeError {
    #[error("truncated header: need 8 bytes, found {found}")]
    TruncatedHeader { found: usize },
    #[error("truncated payload: need {needed} bytes after header, found {found}")]
    TruncatedPayload { needed: u64, found: usize },
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },
}

#[derive(Debug, Clone)]
// deny manual construct
#[non_exhaustive]
pub struct RawImage {
    pub width: u32,
    pub height: u32,
    pub data: Vec<[f32; CHANNELS]>,
}

impl RawImage {
    pub fn new(width: u32, height: u32, data: Vec<[f32; CHANNELS]>) -> Self {
        // the header stores dimensions as i32
        assert!(width <= i32::MAX as u32 && height <= i32::MAX as u32);
        assert_eq!(width as usize * height as usize, data.len());
        Self {
            width,
            height,
            data,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn pixel(&self, x: u32, y: u32) -> [f32; CHANNELS] {
        self.data[y as usize * self.width as usize + x as usize]
    }

    pub fn row(&self, y: u32) -> &[[f32; CHANNELS]] {
        let start = y as usize * self.width as usize;
        &self.data[start..start + self.width as usize]
    }

    pub fn channels(&self) -> &[f32] {
        bytemuck::cast_slice(&self.data)
    }

    // alpha dropped
    pub fn rgb(&self) -> Vec<[f32; 3]> {
        self.data.iter().map(|&[r, g, b, _]| [r, g, b]).collect()
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        fs::write(path, encode(self))
    }
}

pub fn parse_header<'a, E: ParseError<&'a [u8]>>(input: &'a [u8]) -> IResult<&'a [u8], Header, E> {
    let (rest, width) = le_i32(input)?;
    let (rest, height) = le_i32(rest)?;

    Ok((rest, Header { width, height }))
}

fn parse_pixel<'a, E: ParseError<&'a [u8]>>(
    input: &'a [u8],
) -> IResult<&'a [u8], [f32; CHANNELS], E> {
    let (rest, r) = le_f32(input)?;
    let (rest, g) = le_f32(rest)?;
    let (rest, b) = le_f32(rest)?;
    let (rest, a) = le_f32(rest)?;

    Ok((rest, [r, g, b, a]))
}

fn parse_pixels<'a, E: ParseError<&'a [u8]>>(
    input: &'a [u8],
    width: u32,
    height: u32,
) -> IResult<&'a [u8], Vec<[f32; CHANNELS]>, E> {
    let mut data = Vec::with_capacity(width as usize * height as usize);
    let mut rest = input;

    for _y in 0..height {
        for _x in 0..width {
            let (r, pixel) = parse_pixel(rest)?;
            data.push(pixel);
            rest = r;
        }
    }

    Ok((rest, data))
}

pub fn decode(input: &[u8]) -> Result<RawImage, DecodeError> {
    let (rest, header) = parse_header::<nom::error::Error<&[u8]>>(input)
        .finish()
        .map_err(|_| DecodeError::TruncatedHeader { found: input.len() })?;

    let needed = header.payload_len()?;
    if (rest.len() as u64) < needed {
        return Err(DecodeError::TruncatedPayload {
            needed,
            found: rest.len(),
        });
    }

    let width = header.width as u32;
    let height = header.height as u32;

    // trailing bytes past the payload are ignored
    let payload = &rest[..needed as usize];
    let (_, data) = parse_pixels::<nom::error::Error<&[u8]>>(payload, width, height)
        .finish()
        .map_err(|_| DecodeError::TruncatedPayload {
            needed,
            found: rest.len(),
        })?;

    Ok(RawImage::new(width, height, data))
}

pub fn encode(image: &RawImage) -> Vec<u8> {
    let mut out = Vec::with_capacity(Header::LEN + image.data.len() * PIXEL_LEN);
    out.extend_from_slice(&(image.width as i32).to_le_bytes());
    out.extend_from_slice(&(image.height as i32).to_le_bytes());

    for &channel in image.channels() {
        out.extend_from_slice(&channel.to_le_bytes());
    }

    out
}
