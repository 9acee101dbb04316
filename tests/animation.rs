mod tests {
    use myrtio_light_compositor::animation::filter_onto;
    use myrtio_light_compositor::{
        Animation, BlendMode, Color, DeviceConfiguration, Error, Layer, ReadOnlyDeviceConfiguration,
        ScaledAverage, SimpleFadeAnimation,
    };

    /// 5 ms frames, so a 45 ms constant keeps a fifth of every new value
    fn device() -> ReadOnlyDeviceConfiguration {
        let mut config = DeviceConfiguration::new(2, 1.0).unwrap();
        config.set_update_rate(5.0, 0.0).unwrap();
        config.into()
    }

    #[test]
    fn test_filter_onto_steps_towards_next_frame() {
        let filter = ScaledAverage::new(device(), 45.0).unwrap();
        let displayed = Layer::from_pixels(
            vec![
                Color::with_brightness(101, 0, 0, 201),
                Color::with_brightness(11, 0, 0, 10),
            ],
            BlendMode::Combine,
        )
        .unwrap();
        let next = Layer::from_pixels(
            vec![
                Color::with_brightness(0, 0, 0, 50),
                Color::with_brightness(50, 0, 0, 255),
            ],
            BlendMode::Sum,
        )
        .unwrap();

        let filtered = filter_onto(&displayed, &next, &filter).unwrap();
        // Falling brightness decays, rising brightness jumps
        assert_eq!(filtered[0], Color::with_brightness(80, 0, 0, 170));
        assert_eq!(filtered[1], Color::with_brightness(19, 0, 0, 255));
        assert_eq!(filtered.blend_mode(), BlendMode::Sum);
    }

    #[test]
    fn test_filter_onto_size_mismatch() {
        let filter = ScaledAverage::new(device(), 45.0).unwrap();
        let displayed = Layer::filled(2, BlendMode::Combine, Color::BLACK).unwrap();
        let next = Layer::filled(3, BlendMode::Combine, Color::RED).unwrap();
        let err = filter_onto(&displayed, &next, &filter).unwrap_err();
        assert!(matches!(err, Error::PixelCountMismatch { .. }));
        assert_eq!(err.param(), Some("DisplayedFrame"));
    }

    #[test]
    fn test_fade_keeps_previous_blend_mode() {
        let previous = Layer::filled(2, BlendMode::Favor, Color::BLUE).unwrap();
        let mut fade = SimpleFadeAnimation::with_previous_frame(device(), &previous).unwrap();
        assert!(fade.request_smooth_crossfade());

        let frame = fade.next_frame().unwrap();
        assert_eq!(frame.blend_mode(), BlendMode::Favor);
        // The color cycle starts from red regardless of the previous pixels
        assert_eq!(frame[0].g(), frame[1].g());
        assert_eq!(frame[0].r(), 255 - frame[0].g());
        assert_eq!(frame[0].b(), 0);
    }
}
