#![cfg(feature = "backend_wgpu")]
//! Raw channel buffers in and out of textures.

use textures_and_frames::convert::{raw_from_texture, texture_from_raw, texture_from_raw_3d};
use textures_and_frames::device::Device;
use textures_and_frames::geometry::{Extent2, Extent3, TextureUsage};
use textures_and_frames::pixel_formats::f16;
use textures_and_frames::{BitDepth, Error};

async fn gpu() -> Option<Device> {
    match Device::shared().await {
        Ok(device) => Some(device),
        Err(e) => {
            println!("skipping device-backed test: {e}");
            None
        }
    }
}

#[test]
fn length_mismatch_fails_2d_and_3d() {
    test_executors::spin_on(async {
        let Some(device) = gpu().await else { return };
        let extent = Extent2::new(10, 10);
        let short = vec![0u8; extent.pixel_count() * 4 - 1];
        assert!(matches!(
            texture_from_raw(&device, extent, &short, TextureUsage::WriteAndRead, false).await,
            Err(Error::BufferSizeMismatch {
                expected: 400,
                actual: 399
            })
        ));

        let extent3 = Extent3::new(4, 4, 4);
        let long = vec![0.0f32; extent3.pixel_count() * 4 + 4];
        assert!(matches!(
            texture_from_raw_3d(&device, extent3, &long, TextureUsage::WriteAndRead).await,
            Err(Error::BufferSizeMismatch {
                expected: 256,
                actual: 260
            })
        ));
    });
}

#[test]
fn u8_roundtrip_exact() {
    test_executors::spin_on(async {
        let Some(device) = gpu().await else { return };
        let extent = Extent2::new(33, 7); // deliberately unaligned row
        let samples: Vec<u8> = (0..extent.pixel_count() * 4)
            .map(|i| (i % 251) as u8)
            .collect();
        let texture = texture_from_raw(
            &device,
            extent,
            &samples,
            TextureUsage::WriteAndRead,
            false,
        )
        .await
        .unwrap();
        assert_eq!(texture.bit_depth().unwrap(), BitDepth::Eight);
        let back: Vec<u8> = raw_from_texture(&device, &texture).await.unwrap();
        assert_eq!(back, samples);
    });
}

#[test]
fn f32_roundtrip_exact() {
    test_executors::spin_on(async {
        let Some(device) = gpu().await else { return };
        let extent = Extent2::new(5, 9);
        let samples: Vec<f32> = (0..extent.pixel_count() * 4)
            .map(|i| i as f32 * 0.375 - 10.0)
            .collect();
        let texture = texture_from_raw(
            &device,
            extent,
            &samples,
            TextureUsage::WriteAndRead,
            false,
        )
        .await
        .unwrap();
        let back: Vec<f32> = raw_from_texture(&device, &texture).await.unwrap();
        assert_eq!(back, samples);
    });
}

#[test]
fn half_roundtrip_exact() {
    test_executors::spin_on(async {
        let Some(device) = gpu().await else { return };
        let extent = Extent2::new(6, 6);
        let samples: Vec<f16> = (0..extent.pixel_count() * 4)
            .map(|i| f16::from_f32(i as f32 / 17.0))
            .collect();
        let texture = texture_from_raw(
            &device,
            extent,
            &samples,
            TextureUsage::WriteAndRead,
            false,
        )
        .await
        .unwrap();
        assert_eq!(texture.bit_depth().unwrap(), BitDepth::Sixteen);
        let back: Vec<f16> = raw_from_texture(&device, &texture).await.unwrap();
        assert_eq!(back, samples);
    });
}

#[test]
fn volume_roundtrip_exact() {
    test_executors::spin_on(async {
        let Some(device) = gpu().await else { return };
        let extent = Extent3::new(4, 3, 5);
        let samples: Vec<u8> = (0..extent.pixel_count() * 4)
            .map(|i| (i * 3 % 256) as u8)
            .collect();
        let texture = texture_from_raw_3d(&device, extent, &samples, TextureUsage::WriteAndRead)
            .await
            .unwrap();
        assert_eq!(texture.extent3(), extent);
        let back: Vec<u8> = raw_from_texture(&device, &texture).await.unwrap();
        assert_eq!(back, samples);
    });
}

#[test]
fn mismatched_sample_type_fails() {
    test_executors::spin_on(async {
        let Some(device) = gpu().await else { return };
        let extent = Extent2::new(4, 4);
        let samples = vec![0u8; extent.pixel_count() * 4];
        let texture = texture_from_raw(
            &device,
            extent,
            &samples,
            TextureUsage::WriteAndRead,
            false,
        )
        .await
        .unwrap();
        let result: Result<Vec<f32>, _> = raw_from_texture(&device, &texture).await;
        assert!(matches!(
            result,
            Err(Error::UnsupportedBits(BitDepth::ThirtyTwo))
        ));
    });
}

#[test]
fn swapped_transport_order_roundtrips() {
    test_executors::spin_on(async {
        let Some(device) = gpu().await else { return };
        let extent = Extent2::new(3, 3);
        // caller supplies BGRA-ordered bytes for the swapped variant
        let samples: Vec<u8> = (0..extent.pixel_count())
            .flat_map(|_| [10u8, 20, 30, 255])
            .collect();
        let texture =
            texture_from_raw(&device, extent, &samples, TextureUsage::RenderAndRead, true)
                .await
                .unwrap();
        assert!(texture.swaps_channels());
        let back: Vec<u8> = raw_from_texture(&device, &texture).await.unwrap();
        assert_eq!(back, samples);
    });
}
