mod tests {
    use myrtio_light_compositor::{BlendMode, Color, Error, Layer, PixelRange};

    #[test]
    fn test_new_layer() {
        let layer = Layer::new(4).unwrap();
        assert_eq!(layer.pixel_count(), 4);
        assert_eq!(layer.blend_mode(), BlendMode::Combine);
        assert!(layer.iter().all(|pixel| pixel == Color::BLACK));

        let err = Layer::new(0).unwrap_err();
        assert_eq!(err.param(), Some("PixelCount"));
        assert!(Layer::from_pixels(Vec::new(), BlendMode::Sum).is_err());
    }

    #[test]
    fn test_pixel_access() {
        let mut layer = Layer::filled(3, BlendMode::Combine, Color::TRANSPARENT).unwrap();
        layer.set_pixel(2, Color::RED).unwrap();
        assert_eq!(layer.pixel(2).unwrap(), Color::RED);
        assert_eq!(layer[2], Color::RED);

        layer[0] = Color::BLUE;
        assert_eq!(layer.pixel(0).unwrap(), Color::BLUE);

        let err = layer.pixel(3).unwrap_err();
        assert!(matches!(err, Error::IndexOutOfBounds { index: 3, max: 2 }));
        assert_eq!(
            err.to_string(),
            "Pixel index of 3 out of bounds. Pixel index must be within 0 to PixelCount-1 (2)."
        );
        assert!(layer.set_pixel(7, Color::RED).is_err());
    }

    #[test]
    #[should_panic(expected = "Pixel index of 5 out of bounds")]
    fn test_index_panics_out_of_bounds() {
        let layer = Layer::new(2).unwrap();
        let _ = layer[5];
    }

    #[test]
    fn test_pixels_are_a_snapshot() {
        let layer = Layer::filled(2, BlendMode::Combine, Color::GREEN).unwrap();
        let mut pixels = layer.pixels();
        pixels[0] = Color::RED;
        assert_eq!(layer[0], Color::GREEN);

        let iter = layer.iter();
        assert_eq!(iter.len(), 2);
        assert_eq!(layer.iter().rev().count(), 2);
        assert_eq!((&layer).into_iter().collect::<Vec<_>>(), vec![Color::GREEN; 2]);
    }

    #[test]
    fn test_ranges() {
        let mut layer = Layer::filled(5, BlendMode::Combine, Color::TRANSPARENT).unwrap();
        layer.fill_range(PixelRange::new(1, 3), Color::RED).unwrap();
        assert_eq!(
            layer.pixels(),
            vec![
                Color::TRANSPARENT,
                Color::RED,
                Color::RED,
                Color::TRANSPARENT,
                Color::TRANSPARENT
            ]
        );

        layer.set_brightness_range(PixelRange::new(2, 5), 10).unwrap();
        assert_eq!(layer[1], Color::RED);
        assert_eq!(layer[2], Color::RED.set_brightness(10));
        assert_eq!(layer[4], Color::with_brightness(0, 0, 0, 10));

        let err = layer.fill_range(PixelRange::new(4, 6), Color::RED).unwrap_err();
        assert_eq!(err.param(), Some("PixelRange"));
        assert!(layer.fill_range(PixelRange::new(3, 2), Color::RED).is_err());
        layer.fill_range(PixelRange::new(5, 5), Color::BLUE).unwrap();
    }

    #[test]
    fn test_has_effect() {
        let mut layer = Layer::filled(3, BlendMode::Combine, Color::TRANSPARENT).unwrap();
        assert!(!layer.has_effect());
        layer[1] = Color::with_brightness(0, 0, 0, 1);
        assert!(layer.has_effect());
    }

    #[test]
    fn test_blend_uses_layer_mode() {
        let mut lower = Layer::filled(2, BlendMode::Replace, Color::new(10, 10, 10)).unwrap();
        let upper = Layer::filled(2, BlendMode::Combine, Color::new(0, 20, 0)).unwrap();
        lower.blend(&upper).unwrap();
        assert_eq!(lower[0], Color::new(0, 20, 0));

        let mut lower = Layer::filled(2, BlendMode::Combine, Color::new(10, 10, 10)).unwrap();
        lower.blend(&upper).unwrap();
        assert_eq!(lower[1], Color::new(10, 20, 10));

        lower.blend_with_mode(&upper, BlendMode::Sum).unwrap();
        assert_eq!(lower[1], Color::new(10, 40, 10));
    }

    #[test]
    fn test_blend_count_mismatch() {
        let mut lower = Layer::new(3).unwrap();
        let upper = Layer::new(4).unwrap();
        let err = lower.blend(&upper).unwrap_err();
        assert_eq!(err.param(), Some("UpperLayer"));
        assert_eq!(
            err.to_string(),
            "UpperLayer must have the same number of pixels as this layer to blend together."
        );

        // Mismatch wins over a bad opacity
        let err = lower.blend_opacity(&upper, 4.0).unwrap_err();
        assert_eq!(err.param(), Some("UpperLayer"));
        let err = lower.blend_opacity(&Layer::new(3).unwrap(), 4.0).unwrap_err();
        assert_eq!(err.param(), Some("Opacity"));
    }

    #[test]
    fn test_faded() {
        let from =
            Layer::filled(2, BlendMode::Sum, Color::with_brightness(65, 128, 64, 32)).unwrap();
        let to = Layer::filled(2, BlendMode::Combine, Color::with_brightness(64, 128, 255, 100))
            .unwrap();
        let faded = from.faded(&to, 0.75).unwrap();
        assert_eq!(faded[0], Color::with_brightness(64, 128, 207, 83));
        assert_eq!(faded.blend_mode(), BlendMode::Sum);
        assert_eq!(from[0], Color::with_brightness(65, 128, 64, 32));
    }

    #[test]
    fn test_display() {
        let layer = Layer::filled(8, BlendMode::Favor, Color::TRANSPARENT).unwrap();
        assert_eq!(
            layer.to_string(),
            "[Layer: PixelCount=8, BlendMode=Favor, HasEffect=false]"
        );
    }
}
