//! CPU rendering backend built on the `image` and `imageproc` crates.
//!
//! Filters here are pure functions of their bound inputs: rendering the
//! same source with the same values twice yields bit-identical output.
//! Blurs and geometric warps delegate to `imageproc`; tone filters are
//! plain per-pixel maps.

use crate::backend::{FilterBackend, FilterHandle, InputValue};
use crate::core::error::{EditError, EditResult};
use crate::core::params::{keys, ParameterId};
use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::filter::gaussian_blur_f32;
use imageproc::geometric_transformations::{warp_with, Interpolation};
use indexmap::IndexSet;
use std::collections::HashMap;
use std::sync::Arc;

/// Deterministic software rendering backend.
///
/// Cheap to construct in practice, but sessions still treat it like any
/// collaborator: one instance per session, reused across renders.
#[derive(Debug, Clone, Copy, Default)]
pub struct SoftwareBackend;

impl SoftwareBackend {
    /// Create a new software backend.
    pub fn new() -> Self {
        Self
    }
}

/// Pixel transformation for one filter.
type Kernel = fn(&DynamicImage, &InputBag) -> DynamicImage;

/// Inputs bound to a software filter instance.
#[derive(Debug, Default)]
struct InputBag {
    values: HashMap<String, InputValue>,
}

impl InputBag {
    fn insert(&mut self, key: &str, value: InputValue) {
        self.values.insert(key.to_string(), value);
    }

    fn scalar(&self, key: &str, default: f64) -> f64 {
        self.values
            .get(key)
            .and_then(InputValue::as_scalar)
            .unwrap_or(default)
    }

    fn position_or(&self, key: &str, default: (f64, f64)) -> (f64, f64) {
        self.values
            .get(key)
            .and_then(InputValue::as_position)
            .unwrap_or(default)
    }

    fn image(&self) -> Option<&Arc<DynamicImage>> {
        self.values.get(keys::IMAGE).and_then(InputValue::as_image)
    }
}

/// A configurable instance of one software filter.
pub struct SoftwareFilter {
    name: String,
    accepted: IndexSet<&'static str>,
    inputs: InputBag,
    kernel: Kernel,
}

impl FilterBackend for SoftwareBackend {
    fn create_filter(&self, name: &str) -> EditResult<Box<dyn FilterHandle>> {
        let (accepted, kernel): (&[&'static str], Kernel) = match name {
            "sepia_tone" => (&[keys::IMAGE, keys::INTENSITY], sepia_tone),
            "bump_distortion" => (
                &[keys::IMAGE, keys::RADIUS, keys::SCALE, keys::CENTER],
                bump_distortion,
            ),
            "gaussian_blur" => (&[keys::IMAGE, keys::RADIUS], gaussian_blur),
            "pixellate" => (&[keys::IMAGE, keys::SCALE, keys::CENTER], pixellate),
            "twirl_distortion" => (
                &[keys::IMAGE, keys::RADIUS, keys::CENTER],
                twirl_distortion,
            ),
            "unsharp_mask" => (&[keys::IMAGE, keys::INTENSITY, keys::RADIUS], unsharp_mask),
            "vignette" => (&[keys::IMAGE, keys::INTENSITY, keys::RADIUS], vignette),
            _ => return Err(EditError::UnknownFilter(name.to_string())),
        };

        Ok(Box::new(SoftwareFilter {
            name: name.to_string(),
            accepted: accepted.iter().copied().collect(),
            inputs: InputBag::default(),
            kernel,
        }))
    }
}

impl FilterHandle for SoftwareFilter {
    fn accepted_input_keys(&self) -> &IndexSet<&'static str> {
        &self.accepted
    }

    fn set_input(&mut self, key: &str, value: InputValue) {
        self.inputs.insert(key, value);
    }

    fn render_output(&self) -> EditResult<DynamicImage> {
        let source = self.inputs.image().ok_or_else(|| EditError::RenderUnavailable {
            filter: self.name.clone(),
        })?;
        if source.width() == 0 || source.height() == 0 {
            return Err(EditError::RenderUnavailable {
                filter: self.name.clone(),
            });
        }
        Ok((self.kernel)(source, &self.inputs))
    }
}

/// Effect center, defaulting to the image center when unbound.
fn center_of(inputs: &InputBag, image: &DynamicImage) -> (f32, f32) {
    let default = (image.width() as f64 / 2.0, image.height() as f64 / 2.0);
    let (cx, cy) = inputs.position_or(keys::CENTER, default);
    (cx as f32, cy as f32)
}

fn mix(from: f32, to: f32, t: f32) -> u8 {
    (from + (to - from) * t).round().clamp(0.0, 255.0) as u8
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge1 <= edge0 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Classic sepia weighting, blended with the source by intensity.
fn sepia_tone(source: &DynamicImage, inputs: &InputBag) -> DynamicImage {
    let t = inputs.scalar(keys::INTENSITY, 1.0).clamp(0.0, 1.0) as f32;
    let mut out = source.to_rgba8();
    for pixel in out.pixels_mut() {
        let [r, g, b, a] = pixel.0;
        let (rf, gf, bf) = (r as f32, g as f32, b as f32);
        let sr = (rf * 0.393 + gf * 0.769 + bf * 0.189).min(255.0);
        let sg = (rf * 0.349 + gf * 0.686 + bf * 0.168).min(255.0);
        let sb = (rf * 0.272 + gf * 0.534 + bf * 0.131).min(255.0);
        pixel.0 = [mix(rf, sr, t), mix(gf, sg, t), mix(bf, sb, t), a];
    }
    DynamicImage::ImageRgba8(out)
}

fn gaussian_blur(source: &DynamicImage, inputs: &InputBag) -> DynamicImage {
    let radius = inputs.scalar(keys::RADIUS, ParameterId::Radius.max_value());
    // The slider radius is the ~3-sigma support of the kernel.
    let sigma = (radius / 3.0).max(0.05) as f32;
    DynamicImage::ImageRgba8(gaussian_blur_f32(&source.to_rgba8(), sigma))
}

/// Quantizes pixels into square blocks aligned on the effect center.
fn pixellate(source: &DynamicImage, inputs: &InputBag) -> DynamicImage {
    let block = inputs.scalar(keys::SCALE, ParameterId::Scale.max_value()).max(1.0);
    let (cx, cy) = center_of(inputs, source);
    let (cx, cy) = (cx as f64, cy as f64);

    let src = source.to_rgba8();
    let (width, height) = src.dimensions();
    let mut out = RgbaImage::new(width, height);
    for (x, y, pixel) in out.enumerate_pixels_mut() {
        let sx = ((((x as f64 - cx) / block).floor() + 0.5) * block + cx)
            .clamp(0.0, (width - 1) as f64);
        let sy = ((((y as f64 - cy) / block).floor() + 0.5) * block + cy)
            .clamp(0.0, (height - 1) as f64);
        *pixel = *src.get_pixel(sx as u32, sy as u32);
    }
    DynamicImage::ImageRgba8(out)
}

/// Magnifies pixels near the center, easing out to identity at the radius.
fn bump_distortion(source: &DynamicImage, inputs: &InputBag) -> DynamicImage {
    let radius = inputs.scalar(keys::RADIUS, ParameterId::Radius.max_value()).max(1.0) as f32;
    let strength = (inputs.scalar(keys::SCALE, ParameterId::Scale.max_value())
        / ParameterId::Scale.max_value())
    .clamp(0.0, 1.0) as f32;
    let (cx, cy) = center_of(inputs, source);

    let src = source.to_rgba8();
    let out = warp_with(
        &src,
        |x, y| {
            let dx = x - cx;
            let dy = y - cy;
            let r = (dx * dx + dy * dy).sqrt();
            if r >= radius || r <= f32::EPSILON {
                return (x, y);
            }
            let t = 1.0 - r / radius;
            let shrink = 1.0 - strength * t * t;
            (cx + dx * shrink, cy + dy * shrink)
        },
        Interpolation::Bilinear,
        Rgba([0, 0, 0, 0]),
    );
    DynamicImage::ImageRgba8(out)
}

/// Rotates pixels around the center; the twist decays to zero at the radius.
fn twirl_distortion(source: &DynamicImage, inputs: &InputBag) -> DynamicImage {
    let radius = inputs.scalar(keys::RADIUS, ParameterId::Radius.max_value()).max(1.0) as f32;
    let (cx, cy) = center_of(inputs, source);

    let src = source.to_rgba8();
    let out = warp_with(
        &src,
        |x, y| {
            let dx = x - cx;
            let dy = y - cy;
            let r = (dx * dx + dy * dy).sqrt();
            if r >= radius {
                return (x, y);
            }
            let t = 1.0 - r / radius;
            let angle = std::f32::consts::PI * t * t;
            let (sin, cos) = angle.sin_cos();
            (cx + dx * cos - dy * sin, cy + dx * sin + dy * cos)
        },
        Interpolation::Bilinear,
        Rgba([0, 0, 0, 0]),
    );
    DynamicImage::ImageRgba8(out)
}

/// Sharpens by adding back the difference against a blurred copy.
fn unsharp_mask(source: &DynamicImage, inputs: &InputBag) -> DynamicImage {
    let amount = inputs.scalar(keys::INTENSITY, 1.0).clamp(0.0, 1.0) as f32;
    let radius = inputs.scalar(keys::RADIUS, ParameterId::Radius.max_value());
    let sigma = (radius / 3.0).max(0.05) as f32;

    let src = source.to_rgba8();
    let blurred = gaussian_blur_f32(&src, sigma);
    let mut out = src;
    for (pixel, blur) in out.pixels_mut().zip(blurred.pixels()) {
        for c in 0..3 {
            let s = pixel.0[c] as f32;
            let b = blur.0[c] as f32;
            pixel.0[c] = (s + amount * (s - b)).round().clamp(0.0, 255.0) as u8;
        }
    }
    DynamicImage::ImageRgba8(out)
}

/// Darkens toward the corners. Radius controls how far inward the falloff
/// reaches; intensity controls how dark the corners get.
fn vignette(source: &DynamicImage, inputs: &InputBag) -> DynamicImage {
    let intensity = inputs.scalar(keys::INTENSITY, 1.0).clamp(0.0, 1.0) as f32;
    let radius_max = ParameterId::Radius.max_value() as f32;
    let radius = (inputs.scalar(keys::RADIUS, ParameterId::Radius.max_value()) as f32)
        .clamp(0.0, radius_max);

    let mut out = source.to_rgba8();
    let (width, height) = out.dimensions();
    let (cx, cy) = (width as f32 / 2.0, height as f32 / 2.0);
    let corner = (cx * cx + cy * cy).sqrt().max(1.0);
    let start = corner * (1.0 - radius / radius_max).clamp(0.0, 0.95);

    for (x, y, pixel) in out.enumerate_pixels_mut() {
        let dx = x as f32 - cx;
        let dy = y as f32 - cy;
        let d = (dx * dx + dy * dy).sqrt();
        let falloff = 1.0 - intensity * smoothstep(start, corner, d);
        for c in 0..3 {
            pixel.0[c] = (pixel.0[c] as f32 * falloff).round().clamp(0.0, 255.0) as u8;
        }
    }
    DynamicImage::ImageRgba8(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::FilterCatalog;

    fn gradient(width: u32, height: u32) -> DynamicImage {
        let img = RgbaImage::from_fn(width, height, |x, y| {
            Rgba([
                (x * 255 / width.max(1)) as u8,
                (y * 255 / height.max(1)) as u8,
                128,
                255,
            ])
        });
        DynamicImage::ImageRgba8(img)
    }

    fn handle_with_source(name: &str, source: &DynamicImage) -> Box<dyn FilterHandle> {
        let mut filter = SoftwareBackend::new().create_filter(name).unwrap();
        filter.set_input(keys::IMAGE, InputValue::Image(Arc::new(source.clone())));
        filter
    }

    #[test]
    fn test_every_catalog_filter_is_implemented() {
        let backend = SoftwareBackend::new();
        for descriptor in FilterCatalog::all() {
            assert!(
                backend.create_filter(descriptor.name).is_ok(),
                "missing software filter for '{}'",
                descriptor.name
            );
        }
    }

    #[test]
    fn test_unknown_filter() {
        let err = SoftwareBackend::new().create_filter("posterize").err().unwrap();
        assert!(matches!(err, EditError::UnknownFilter(_)));
    }

    #[test]
    fn test_accepted_key_sets() {
        let backend = SoftwareBackend::new();
        let keys_of = |name: &str| -> Vec<&'static str> {
            backend
                .create_filter(name)
                .unwrap()
                .accepted_input_keys()
                .iter()
                .copied()
                .collect()
        };

        assert_eq!(keys_of("sepia_tone"), vec![keys::IMAGE, keys::INTENSITY]);
        assert_eq!(
            keys_of("bump_distortion"),
            vec![keys::IMAGE, keys::RADIUS, keys::SCALE, keys::CENTER]
        );
        assert_eq!(keys_of("gaussian_blur"), vec![keys::IMAGE, keys::RADIUS]);
        assert_eq!(keys_of("pixellate"), vec![keys::IMAGE, keys::SCALE, keys::CENTER]);
        assert_eq!(
            keys_of("twirl_distortion"),
            vec![keys::IMAGE, keys::RADIUS, keys::CENTER]
        );
        assert_eq!(
            keys_of("unsharp_mask"),
            vec![keys::IMAGE, keys::INTENSITY, keys::RADIUS]
        );
        assert_eq!(
            keys_of("vignette"),
            vec![keys::IMAGE, keys::INTENSITY, keys::RADIUS]
        );
    }

    #[test]
    fn test_render_without_source_fails() {
        let filter = SoftwareBackend::new().create_filter("sepia_tone").unwrap();
        let err = filter.render_output().unwrap_err();
        assert!(matches!(err, EditError::RenderUnavailable { filter } if filter == "sepia_tone"));
    }

    #[test]
    fn test_all_filters_preserve_dimensions() {
        let source = gradient(32, 24);
        for descriptor in FilterCatalog::all() {
            let filter = handle_with_source(descriptor.name, &source);
            let out = filter.render_output().unwrap();
            assert_eq!((out.width(), out.height()), (32, 24), "{}", descriptor.name);
        }
    }

    #[test]
    fn test_sepia_full_strength_changes_pixels() {
        let source = gradient(16, 16);
        let mut filter = handle_with_source("sepia_tone", &source);
        filter.set_input(keys::INTENSITY, InputValue::Scalar(1.0));
        let out = filter.render_output().unwrap();
        assert_ne!(out.to_rgba8().into_raw(), source.to_rgba8().into_raw());
    }

    #[test]
    fn test_sepia_near_zero_intensity_is_mild() {
        let source = gradient(16, 16);
        let mut filter = handle_with_source("sepia_tone", &source);
        filter.set_input(keys::INTENSITY, InputValue::Scalar(0.0));
        let out = filter.render_output().unwrap();
        // Zero blend returns the source unchanged.
        assert_eq!(out.to_rgba8().into_raw(), source.to_rgba8().into_raw());
    }

    #[test]
    fn test_unbound_radius_defaults_to_full_strength() {
        let source = gradient(16, 16);
        let unbound = handle_with_source("unsharp_mask", &source);

        let mut bound = handle_with_source("unsharp_mask", &source);
        bound.set_input(
            keys::RADIUS,
            InputValue::Scalar(ParameterId::Radius.max_value()),
        );

        assert_eq!(
            unbound.render_output().unwrap().to_rgba8().into_raw(),
            bound.render_output().unwrap().to_rgba8().into_raw()
        );
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let source = gradient(20, 20);
        for descriptor in FilterCatalog::all() {
            let mut filter = handle_with_source(descriptor.name, &source);
            filter.set_input(keys::RADIUS, InputValue::Scalar(10.0));
            filter.set_input(keys::CENTER, InputValue::Position(10.0, 10.0));
            let first = filter.render_output().unwrap();
            let second = filter.render_output().unwrap();
            assert_eq!(
                first.to_rgba8().into_raw(),
                second.to_rgba8().into_raw(),
                "{} is not deterministic",
                descriptor.name
            );
        }
    }

    #[test]
    fn test_pixellate_produces_constant_blocks() {
        let source = gradient(16, 16);
        let mut filter = handle_with_source("pixellate", &source);
        filter.set_input(keys::SCALE, InputValue::Scalar(8.0));
        filter.set_input(keys::CENTER, InputValue::Position(8.0, 8.0));
        let out = filter.render_output().unwrap().to_rgba8();
        // All pixels within the top-left block sample the same source pixel.
        let anchor = *out.get_pixel(0, 0);
        for y in 0..8 {
            for x in 0..8 {
                assert_eq!(*out.get_pixel(x, y), anchor);
            }
        }
    }
}
