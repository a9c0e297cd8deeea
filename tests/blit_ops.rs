#![cfg(feature = "backend_wgpu")]
//! GPU copy utilities: full copies, slab extraction, stacking, and the
//! color-space compute pass.

use textures_and_frames::blit::{
    TextureStack, convert_color_space, copy_texture, copy_texture_into, extract_slice,
    stack_textures,
};
use textures_and_frames::convert::{raw_from_texture, texture_from_raw, texture_from_raw_3d};
use textures_and_frames::device::Device;
use textures_and_frames::geometry::{Axis, Extent2, Extent3, TextureUsage};
use textures_and_frames::texture::{Texture, TextureKind};
use textures_and_frames::{BitDepth, ColorSpace, Error};

async fn gpu() -> Option<Device> {
    match Device::shared().await {
        Ok(device) => Some(device),
        Err(e) => {
            println!("skipping device-backed test: {e}");
            None
        }
    }
}

fn volume_samples(extent: Extent3) -> Vec<u8> {
    let mut samples = Vec::with_capacity(extent.pixel_count() * 4);
    for z in 0..extent.depth {
        for y in 0..extent.height {
            for x in 0..extent.width {
                samples.extend_from_slice(&[x as u8, y as u8, z as u8, 255]);
            }
        }
    }
    samples
}

#[test]
fn full_copy_preserves_content() {
    test_executors::spin_on(async {
        let Some(device) = gpu().await else { return };
        let extent = Extent2::new(17, 5);
        let samples: Vec<u8> = (0..extent.pixel_count() * 4).map(|i| i as u8).collect();
        let src = texture_from_raw(&device, extent, &samples, TextureUsage::WriteAndRead, false)
            .await
            .unwrap();
        let copy = copy_texture(&device, &src).await.unwrap();
        assert_eq!(copy.extent2(), extent);
        let back: Vec<u8> = raw_from_texture(&device, &copy).await.unwrap();
        assert_eq!(back, samples);
    });
}

#[test]
fn copy_into_validates_destination() {
    test_executors::spin_on(async {
        let Some(device) = gpu().await else { return };
        let extent = Extent2::new(8, 8);
        let samples = vec![9u8; extent.pixel_count() * 4];
        let src = texture_from_raw(&device, extent, &samples, TextureUsage::WriteAndRead, false)
            .await
            .unwrap();

        let small = Texture::empty_2d(
            &device,
            Extent2::new(4, 8),
            BitDepth::Eight,
            TextureUsage::WriteAndRead,
            false,
            1,
            false,
            "small",
        )
        .await
        .unwrap();
        assert!(matches!(
            copy_texture_into(&device, &src, &small).await,
            Err(Error::DifferentResolutions)
        ));

        let wider = Texture::empty_2d(
            &device,
            extent,
            BitDepth::Sixteen,
            TextureUsage::WriteAndRead,
            false,
            1,
            false,
            "wider depth",
        )
        .await
        .unwrap();
        assert!(matches!(
            copy_texture_into(&device, &src, &wider).await,
            Err(Error::UnsupportedPixelFormat(_))
        ));

        // a matching destination takes the content with no new allocation
        let dst = Texture::empty_2d(
            &device,
            extent,
            BitDepth::Eight,
            TextureUsage::WriteAndRead,
            false,
            1,
            false,
            "dst",
        )
        .await
        .unwrap();
        copy_texture_into(&device, &src, &dst).await.unwrap();
        let back: Vec<u8> = raw_from_texture(&device, &dst).await.unwrap();
        assert_eq!(back, samples);
    });
}

#[test]
fn slice_bounds_are_checked() {
    test_executors::spin_on(async {
        let Some(device) = gpu().await else { return };
        let extent = Extent3::new(6, 4, 3);
        let src = texture_from_raw_3d(
            &device,
            extent,
            &volume_samples(extent),
            TextureUsage::WriteAndRead,
        )
        .await
        .unwrap();
        match extract_slice(&device, &src, Axis::Z, 3).await {
            Err(Error::IndexOutOfBounds { index, extent }) => {
                assert_eq!(index, 3);
                assert_eq!(extent, 3);
            }
            other => panic!("expected IndexOutOfBounds, got {other:?}"),
        }
        assert!(matches!(
            extract_slice(&device, &src, Axis::X, 6).await,
            Err(Error::IndexOutOfBounds { .. })
        ));
    });
}

#[test]
fn slices_match_the_non_sampled_axes() {
    test_executors::spin_on(async {
        let Some(device) = gpu().await else { return };
        let extent = Extent3::new(6, 4, 3);
        let src = texture_from_raw_3d(
            &device,
            extent,
            &volume_samples(extent),
            TextureUsage::WriteAndRead,
        )
        .await
        .unwrap();

        let z_slice = extract_slice(&device, &src, Axis::Z, 1).await.unwrap();
        assert_eq!(z_slice.extent2(), Extent2::new(6, 4));
        let z_back: Vec<u8> = raw_from_texture(&device, &z_slice).await.unwrap();
        // every pixel of z slice 1 carries z == 1
        for px in z_back.chunks_exact(4) {
            assert_eq!(px[2], 1);
        }

        let x_slice = extract_slice(&device, &src, Axis::X, 2).await.unwrap();
        assert_eq!(x_slice.extent2(), Extent2::new(3, 4));
        let x_back: Vec<u8> = raw_from_texture(&device, &x_slice).await.unwrap();
        for (i, px) in x_back.chunks_exact(4).enumerate() {
            let dst_x = i % 3; // landed at x = source z
            let dst_y = i / 3;
            assert_eq!(px[0], 2, "x channel fixed at slice index");
            assert_eq!(px[1], dst_y as u8);
            assert_eq!(px[2], dst_x as u8);
        }

        let y_slice = extract_slice(&device, &src, Axis::Y, 3).await.unwrap();
        assert_eq!(y_slice.extent2(), Extent2::new(6, 3));
    });
}

#[test]
fn stacking_validates_and_orders_slices() {
    test_executors::spin_on(async {
        let Some(device) = gpu().await else { return };
        assert!(matches!(
            stack_textures(&device, &[], TextureStack::Array).await,
            Err(Error::Empty)
        ));

        let extent = Extent2::new(5, 5);
        let mut inputs = Vec::new();
        for i in 0..4u8 {
            let samples = vec![i; extent.pixel_count() * 4];
            inputs.push(
                texture_from_raw(&device, extent, &samples, TextureUsage::WriteAndRead, false)
                    .await
                    .unwrap(),
            );
        }

        let odd_samples = vec![7u8; 4 * 4 * 4];
        let odd = texture_from_raw(
            &device,
            Extent2::new(4, 4),
            &odd_samples,
            TextureUsage::WriteAndRead,
            false,
        )
        .await
        .unwrap();
        let mut mixed: Vec<Texture> = inputs.clone();
        mixed.push(odd);
        assert!(matches!(
            stack_textures(&device, &mixed, TextureStack::Array).await,
            Err(Error::DifferentResolutions)
        ));

        let array = stack_textures(&device, &inputs, TextureStack::Array)
            .await
            .unwrap();
        assert_eq!(array.kind(), TextureKind::D2Array);
        assert_eq!(array.depth_or_layers(), 4);
        let back: Vec<u8> = raw_from_texture(&device, &array).await.unwrap();
        let per_slice = extent.pixel_count() * 4;
        for (slice, chunk) in back.chunks_exact(per_slice).enumerate() {
            assert!(chunk.iter().all(|b| *b == slice as u8));
        }

        let volume = stack_textures(&device, &inputs, TextureStack::Volume)
            .await
            .unwrap();
        assert_eq!(volume.kind(), TextureKind::D3);
        assert_eq!(volume.depth_or_layers(), 4);
    });
}

#[test]
fn color_conversion_encodes_the_destination_curve() {
    test_executors::spin_on(async {
        let Some(device) = gpu().await else { return };
        let extent = Extent2::new(4, 4);
        // mid grey, encoded sRGB
        let samples: Vec<f32> = (0..extent.pixel_count())
            .flat_map(|_| [0.5f32, 0.5, 0.5, 1.0])
            .collect();
        let src = texture_from_raw(&device, extent, &samples, TextureUsage::WriteAndRead, false)
            .await
            .unwrap();
        let linear = convert_color_space(&device, &src, ColorSpace::Srgb, ColorSpace::LinearSrgb)
            .await
            .unwrap();
        let back: Vec<f32> = raw_from_texture(&device, &linear).await.unwrap();
        // srgb 0.5 decodes near 0.2140
        assert!((back[0] - 0.2140).abs() < 1e-3, "got {}", back[0]);
        assert!((back[3] - 1.0).abs() < 1e-6, "alpha untouched");

        // identical profiles degenerate to a copy
        let copied = convert_color_space(&device, &src, ColorSpace::Srgb, ColorSpace::Srgb)
            .await
            .unwrap();
        let copy_back: Vec<f32> = raw_from_texture(&device, &copied).await.unwrap();
        assert_eq!(copy_back, samples);
    });
}

#[test]
fn gamut_conversion_roundtrips_through_p3() {
    test_executors::spin_on(async {
        let Some(device) = gpu().await else { return };
        let extent = Extent2::new(2, 2);
        let samples: Vec<f32> = (0..extent.pixel_count())
            .flat_map(|_| [0.8f32, 0.3, 0.1, 1.0])
            .collect();
        let src = texture_from_raw(&device, extent, &samples, TextureUsage::WriteAndRead, false)
            .await
            .unwrap();
        let p3 = convert_color_space(
            &device,
            &src,
            ColorSpace::LinearSrgb,
            ColorSpace::LinearDisplayP3,
        )
        .await
        .unwrap();
        let p3_samples: Vec<f32> = raw_from_texture(&device, &p3).await.unwrap();
        assert!((p3_samples[0] - samples[0]).abs() > 1e-3, "gamut map moved red");

        let back = convert_color_space(
            &device,
            &p3,
            ColorSpace::LinearDisplayP3,
            ColorSpace::LinearSrgb,
        )
        .await
        .unwrap();
        let restored: Vec<f32> = raw_from_texture(&device, &back).await.unwrap();
        for (a, b) in samples.iter().zip(restored.iter()) {
            assert!((a - b).abs() < 1e-3, "{a} vs {b}");
        }
    });
}
