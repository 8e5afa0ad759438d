//! PNG encoding for RGBA tiles.
//!
//! Tiles are mostly transparent with a handful of flat colours, so the
//! encoder first tries an indexed image (color type 3) with a `tRNS` chunk
//! and only falls back to full RGBA (color type 6) when the image has more
//! than 256 distinct colours, which anti-aliased edges can cause.

use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::io::Write;

/// Maximum colors for indexed PNG (PNG8)
const MAX_PALETTE_SIZE: usize = 256;

/// Minimum pixels to benefit from parallel palette extraction
const PARALLEL_THRESHOLD: usize = 4096;

const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

const COLOR_TYPE_INDEXED: u8 = 3;
const COLOR_TYPE_RGBA: u8 = 6;

type Palette = Vec<(u8, u8, u8, u8)>;

/// Encode straight (non-premultiplied) RGBA pixels, picking indexed or RGBA
/// output automatically.
pub fn create_png_auto(pixels: &[u8], width: usize, height: usize) -> Result<Vec<u8>, String> {
    check_len(pixels, width, height, 4)?;

    let palette = if pixels.len() / 4 >= PARALLEL_THRESHOLD {
        extract_palette_parallel(pixels)
    } else {
        extract_palette_sequential(pixels)
    };

    match palette {
        Some((palette, indices)) => create_png_indexed(width, height, &palette, &indices),
        None => create_png(pixels, width, height),
    }
}

/// Pack RGBA bytes into a u32 for faster hashing and comparison
#[inline(always)]
fn pack_color(r: u8, g: u8, b: u8, a: u8) -> u32 {
    u32::from_le_bytes([r, g, b, a])
}

#[inline(always)]
fn unpack_color(packed: u32) -> (u8, u8, u8, u8) {
    let [r, g, b, a] = packed.to_le_bytes();
    (r, g, b, a)
}

fn extract_palette_sequential(pixels: &[u8]) -> Option<(Palette, Vec<u8>)> {
    let mut color_to_index: HashMap<u32, u8> = HashMap::with_capacity(MAX_PALETTE_SIZE);
    let mut palette: Palette = Vec::with_capacity(MAX_PALETTE_SIZE);
    let mut indices: Vec<u8> = Vec::with_capacity(pixels.len() / 4);

    for px in pixels.chunks_exact(4) {
        let packed = pack_color(px[0], px[1], px[2], px[3]);
        let index = match color_to_index.get(&packed) {
            Some(&idx) => idx,
            None => {
                if palette.len() >= MAX_PALETTE_SIZE {
                    return None;
                }
                let idx = palette.len() as u8;
                palette.push((px[0], px[1], px[2], px[3]));
                color_to_index.insert(packed, idx);
                idx
            }
        };
        indices.push(index);
    }

    Some((palette, indices))
}

/// Parallel palette extraction: collect per-chunk colour sets, merge, then
/// map pixels to indices in parallel.
///
/// The merged palette is sorted so identical images always encode to
/// identical bytes.
fn extract_palette_parallel(pixels: &[u8]) -> Option<(Palette, Vec<u8>)> {
    let chunk_pixels = (pixels.len() / 4 / rayon::current_num_threads()).max(256);
    let chunk_size = chunk_pixels * 4;

    let mut unique_colors: Vec<u32> = pixels
        .par_chunks(chunk_size)
        .flat_map(|chunk| {
            let mut local: HashSet<u32> = HashSet::with_capacity(MAX_PALETTE_SIZE);
            for px in chunk.chunks_exact(4) {
                local.insert(pack_color(px[0], px[1], px[2], px[3]));
                if local.len() > MAX_PALETTE_SIZE {
                    break;
                }
            }
            local.into_iter().collect::<Vec<_>>()
        })
        .collect();
    unique_colors.sort_unstable();
    unique_colors.dedup();

    let mut color_to_index: HashMap<u32, u8> = HashMap::with_capacity(MAX_PALETTE_SIZE);
    let mut palette: Palette = Vec::with_capacity(MAX_PALETTE_SIZE);
    for packed in unique_colors {
        if palette.len() >= MAX_PALETTE_SIZE {
            return None;
        }
        color_to_index.insert(packed, palette.len() as u8);
        palette.push(unpack_color(packed));
    }

    let mut indices = vec![0u8; pixels.len() / 4];
    indices
        .par_chunks_mut(chunk_pixels)
        .zip(pixels.par_chunks(chunk_size))
        .for_each(|(out, src)| {
            for (idx, px) in out.iter_mut().zip(src.chunks_exact(4)) {
                let packed = pack_color(px[0], px[1], px[2], px[3]);
                *idx = color_to_index.get(&packed).copied().unwrap_or(0);
            }
        });

    Some((palette, indices))
}

/// Encode an indexed PNG from a palette and one index per pixel.
///
/// A `tRNS` chunk is written only when some palette entry is not opaque.
pub fn create_png_indexed(
    width: usize,
    height: usize,
    palette: &[(u8, u8, u8, u8)],
    indices: &[u8],
) -> Result<Vec<u8>, String> {
    check_len(indices, width, height, 1)?;
    if palette.is_empty() || palette.len() > MAX_PALETTE_SIZE {
        return Err(format!("palette must hold 1..=256 colors, got {}", palette.len()));
    }

    let mut png = start_png(width, height, COLOR_TYPE_INDEXED);

    let plte: Vec<u8> = palette.iter().flat_map(|&(r, g, b, _)| [r, g, b]).collect();
    write_chunk(&mut png, b"PLTE", &plte);

    if palette.iter().any(|&(_, _, _, a)| a < 255) {
        let trns: Vec<u8> = palette.iter().map(|&(_, _, _, a)| a).collect();
        write_chunk(&mut png, b"tRNS", &trns);
    }

    let idat = deflate_scanlines(indices, width, height, 1)?;
    write_chunk(&mut png, b"IDAT", &idat);
    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

/// Encode straight RGBA pixels as a color type 6 PNG.
pub fn create_png(pixels: &[u8], width: usize, height: usize) -> Result<Vec<u8>, String> {
    check_len(pixels, width, height, 4)?;

    let mut png = start_png(width, height, COLOR_TYPE_RGBA);
    let idat = deflate_scanlines(pixels, width, height, 4)?;
    write_chunk(&mut png, b"IDAT", &idat);
    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

fn check_len(data: &[u8], width: usize, height: usize, bytes_per_pixel: usize) -> Result<(), String> {
    let expected = width * height * bytes_per_pixel;
    if data.len() != expected {
        return Err(format!(
            "expected {} bytes for {}x{} image, got {}",
            expected,
            width,
            height,
            data.len()
        ));
    }
    Ok(())
}

/// Signature plus IHDR for an 8-bit image.
fn start_png(width: usize, height: usize, color_type: u8) -> Vec<u8> {
    let mut png = Vec::new();
    png.extend_from_slice(&PNG_SIGNATURE);

    let mut ihdr = Vec::with_capacity(13);
    ihdr.extend_from_slice(&(width as u32).to_be_bytes());
    ihdr.extend_from_slice(&(height as u32).to_be_bytes());
    ihdr.push(8); // bit depth
    ihdr.push(color_type);
    ihdr.push(0); // compression method
    ihdr.push(0); // filter method
    ihdr.push(0); // interlace method
    write_chunk(&mut png, b"IHDR", &ihdr);

    png
}

/// Zlib-compress scanlines, each prefixed with filter type 0.
fn deflate_scanlines(
    data: &[u8],
    width: usize,
    height: usize,
    bytes_per_pixel: usize,
) -> Result<Vec<u8>, String> {
    let stride = width * bytes_per_pixel;
    let mut raw = Vec::with_capacity(height * (1 + stride));
    for row in data.chunks_exact(stride.max(1)).take(height) {
        raw.push(0);
        raw.extend_from_slice(row);
    }

    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
    encoder
        .write_all(&raw)
        .and_then(|_| encoder.finish())
        .map_err(|e| format!("IDAT compression failed: {}", e))
}

fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}
