#![cfg(feature = "backend_wgpu")]
//! Factory bounds and the empty-texture scenarios, against the real device.
//!
//! Hosts without a usable adapter skip the device-backed assertions.

use textures_and_frames::device::Device;
use textures_and_frames::geometry::{Extent2, Extent3, TextureUsage};
use textures_and_frames::texture::{Texture, TextureKind};
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
fn empty_2d_reports_extent() {
    test_executors::spin_on(async {
        let Some(device) = gpu().await else { return };
        let texture = Texture::empty_2d(
            &device,
            Extent2::new(200, 100),
            BitDepth::Eight,
            TextureUsage::RenderAndRead,
            false,
            1,
            false,
            "scenario 200x100",
        )
        .await
        .unwrap();
        assert_eq!(texture.width(), 200);
        assert_eq!(texture.height(), 100);
        assert_eq!(texture.kind(), TextureKind::D2);
        assert_eq!(texture.bit_depth().unwrap(), BitDepth::Eight);
    });
}

#[test]
fn zero_dimension_fails() {
    test_executors::spin_on(async {
        let Some(device) = gpu().await else { return };
        for extent in [Extent2::new(0, 100), Extent2::new(200, 0)] {
            let result = Texture::empty_2d(
                &device,
                extent,
                BitDepth::Eight,
                TextureUsage::RenderAndRead,
                false,
                1,
                false,
                "zero",
            )
            .await;
            assert!(matches!(result, Err(Error::ResolutionZero)));
        }
    });
}

#[test]
fn over_max_fails_with_the_max() {
    test_executors::spin_on(async {
        let Some(device) = gpu().await else { return };
        let max2 = device.max_extent_2d();
        match Texture::empty_2d(
            &device,
            Extent2::new(max2 + 1, 16),
            BitDepth::Eight,
            TextureUsage::RenderAndRead,
            false,
            1,
            false,
            "too wide",
        )
        .await
        {
            Err(Error::ResolutionTooHigh { max }) => assert_eq!(max, max2),
            other => panic!("expected ResolutionTooHigh, got {other:?}"),
        }

        let max3 = device.max_extent_3d();
        match Texture::empty_3d(
            &device,
            Extent3::new(4, 4, max3 + 1),
            BitDepth::Sixteen,
            TextureUsage::WriteAndRead,
            "too deep",
        )
        .await
        {
            Err(Error::ResolutionTooHigh { max }) => assert_eq!(max, max3),
            other => panic!("expected ResolutionTooHigh, got {other:?}"),
        }
    });
}

#[test]
fn volume_and_array_kinds() {
    test_executors::spin_on(async {
        let Some(device) = gpu().await else { return };
        let volume = Texture::empty_3d(
            &device,
            Extent3::new(8, 8, 4),
            BitDepth::ThirtyTwo,
            TextureUsage::WriteAndRead,
            "volume",
        )
        .await
        .unwrap();
        assert_eq!(volume.kind(), TextureKind::D3);
        assert_eq!(volume.depth_or_layers(), 4);

        let array = Texture::empty_array(
            &device,
            Extent2::new(8, 8),
            6,
            BitDepth::Eight,
            TextureUsage::RenderAndRead,
            "array",
        )
        .await
        .unwrap();
        assert_eq!(array.kind(), TextureKind::D2Array);
        assert_eq!(array.depth_or_layers(), 6);
    });
}

#[test]
fn swapped_variant_is_still_eight_bit() {
    test_executors::spin_on(async {
        let Some(device) = gpu().await else { return };
        let swapped = Texture::empty_2d(
            &device,
            Extent2::new(16, 16),
            BitDepth::Eight,
            TextureUsage::RenderAndRead,
            true,
            1,
            false,
            "bgra",
        )
        .await
        .unwrap();
        assert!(swapped.swaps_channels());
        assert_eq!(swapped.bit_depth().unwrap(), BitDepth::Eight);
    });
}

#[test]
fn mipmapped_2d_reports_levels() {
    test_executors::spin_on(async {
        let Some(device) = gpu().await else { return };
        let texture = Texture::empty_2d(
            &device,
            Extent2::new(256, 64),
            BitDepth::Eight,
            TextureUsage::RenderAndRead,
            false,
            1,
            true,
            "mips",
        )
        .await
        .unwrap();
        // floor(log2(256)) + 1
        assert_eq!(texture.mip_level_count(), 9);
    });
}

#[test]
fn multisampled_render_target() {
    test_executors::spin_on(async {
        let Some(device) = gpu().await else { return };
        let msaa = Texture::empty_2d(
            &device,
            Extent2::new(64, 64),
            BitDepth::Eight,
            TextureUsage::RenderAndRead,
            false,
            4,
            false,
            "msaa",
        )
        .await
        .unwrap();
        assert_eq!(msaa.kind(), TextureKind::D2Multisampled);
        assert_eq!(msaa.sample_count(), 4);
    });
}
