// Channel values are packed to 0x00RRGGBB words once, right after decode;
// each frame only re-samples the cached words into the framebuffer.
// Escape closes, =/- zoom, 0 resets, arrows pan (Shift steps one pixel).

use minifb::{Key, KeyRepeat, Window, WindowOptions};

const MAX_WINDOW_WIDTH: usize = 1280;
const MAX_WINDOW_HEIGHT: usize = 800;
const MIN_WINDOW_WIDTH: usize = 320;
const MIN_WINDOW_HEIGHT: usize = 240;
const MAX_UPSCALE: f64 = 16.0;

// source pixels per arrow press
const PAN_STEP: f64 = 16.0;
const ZOOM_STEP: f64 = 1.25;
const MIN_ZOOM: f64 = 0.05;
const MAX_ZOOM: f64 = 64.0;

const BACKGROUND: u32 = 0x0020_2020;

struct View {
    zoom: f64,
    scroll_x: f64,
    scroll_y: f64,
}

// NaN survives the clamp and casts to 0
fn tone_map(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0) as u8
}

fn pack(pixel: [f32; 3]) -> u32 {
    let r = tone_map(pixel[0]) as u32;
    let g = tone_map(pixel[1]) as u32;
    let b = tone_map(pixel[2]) as u32;

    (r << 16) | (g << 8) | b
}

// integer upscale for small images, fractional downscale for large ones
fn fit_zoom(width: usize, height: usize) -> f64 {
    let fit = (MAX_WINDOW_WIDTH as f64 / width as f64)
        .min(MAX_WINDOW_HEIGHT as f64 / height as f64);

    if fit >= 1.0 {
        fit.floor().min(MAX_UPSCALE)
    } else {
        fit
    }
}

fn window_size(width: usize, height: usize, zoom: f64) -> (usize, usize) {
    let w = ((width as f64 * zoom).ceil() as usize).clamp(MIN_WINDOW_WIDTH, MAX_WINDOW_WIDTH);
    let h = ((height as f64 * zoom).ceil() as usize).clamp(MIN_WINDOW_HEIGHT, MAX_WINDOW_HEIGHT);

    (w, h)
}

fn clamp_scroll(view: &mut View, width: usize, height: usize, win_width: usize, win_height: usize) {
    let visible_x = win_width as f64 / view.zoom;
    let visible_y = win_height as f64 / view.zoom;

    view.scroll_x = view
        .scroll_x
        .min((width as f64 - visible_x).max(0.0))
        .max(0.0);
    view.scroll_y = view
        .scroll_y
        .min((height as f64 - visible_y).max(0.0))
        .max(0.0);
}

// nearest neighbor; cells outside the image get the background fill
fn blit(
    pixels: &[u32],
    width: usize,
    height: usize,
    framebuf: &mut [u32],
    win_width: usize,
    win_height: usize,
    view: &View,
) {
    for dy in 0..win_height {
        let sy = (dy as f64 / view.zoom + view.scroll_y) as usize;
        for dx in 0..win_width {
            let sx = (dx as f64 / view.zoom + view.scroll_x) as usize;

            framebuf[dy * win_width + dx] = if sx < width && sy < height {
                pixels[sy * width + sx]
            } else {
                BACKGROUND
            };
        }
    }
}

pub fn present(
    width: u32,
    height: u32,
    rgb: &[[f32; 3]],
    title: &str,
) -> Result<(), minifb::Error> {
    let width = width as usize;
    let height = height as usize;
    let pixels: Vec<u32> = rgb.iter().map(|&pixel| pack(pixel)).collect();

    let fit = fit_zoom(width, height);
    let (win_width, win_height) = window_size(width, height, fit);
    let mut view = View {
        zoom: fit,
        scroll_x: 0.0,
        scroll_y: 0.0,
    };

    log::info!(
        "opening {}x{} window at {:.2}x zoom",
        win_width,
        win_height,
        view.zoom
    );

    let mut window = Window::new(
        title,
        win_width,
        win_height,
        WindowOptions {
            resize: false,
            ..WindowOptions::default()
        },
    )?;

    window.set_target_fps(60);

    let mut framebuf = vec![BACKGROUND; win_width * win_height];
    let mut dirty = true;

    while window.is_open() && !window.is_key_down(Key::Escape) {
        let shift = window.is_key_down(Key::LeftShift) || window.is_key_down(Key::RightShift);
        let pan = if shift { 1.0 } else { PAN_STEP };

        if window.is_key_pressed(Key::Right, KeyRepeat::Yes) {
            view.scroll_x += pan;
            dirty = true;
        }
        if window.is_key_pressed(Key::Left, KeyRepeat::Yes) {
            view.scroll_x -= pan;
            dirty = true;
        }
        if window.is_key_pressed(Key::Down, KeyRepeat::Yes) {
            view.scroll_y += pan;
            dirty = true;
        }
        if window.is_key_pressed(Key::Up, KeyRepeat::Yes) {
            view.scroll_y -= pan;
            dirty = true;
        }

        if window.is_key_pressed(Key::Equal, KeyRepeat::Yes) {
            view.zoom = (view.zoom * ZOOM_STEP).min(MAX_ZOOM);
            dirty = true;
        }
        if window.is_key_pressed(Key::Minus, KeyRepeat::Yes) {
            view.zoom = (view.zoom / ZOOM_STEP).max(MIN_ZOOM);
            dirty = true;
        }
        if window.is_key_pressed(Key::Key0, KeyRepeat::No) {
            view = View {
                zoom: fit,
                scroll_x: 0.0,
                scroll_y: 0.0,
            };
            dirty = true;
        }

        if dirty {
            clamp_scroll(&mut view, width, height, win_width, win_height);
            blit(
                &pixels,
                width,
                height,
                &mut framebuf,
                win_width,
                win_height,
                &view,
            );
            window.set_title(&format!("{} | {:.2}x", title, view.zoom));
            dirty = false;
        }

        window.update_with_buffer(&framebuf, win_width, win_height)?;
    }

    Ok(())
}
