mod tests {
    use myrtio_light_compositor::Color;
    use myrtio_light_compositor::math8::scale8;
    use smart_leds::RGB8;

    #[test]
    fn test_scale8() {
        assert_eq!(scale8(255, 128), 128);
        assert_eq!(scale8(0, 128), 0);
        assert_eq!(scale8(128, 128), 64);
        assert_eq!(scale8(128, 255), 128);
        assert_eq!(scale8(128, 0), 0);
        assert_eq!(scale8(255, 255), 255);
    }

    #[test]
    fn test_brightness_applied_to_rgb8() {
        assert_eq!(Color::WHITE.to_rgb8(), RGB8::new(255, 255, 255));
        assert_eq!(
            Color::with_brightness(255, 128, 0, 128).to_rgb8(),
            RGB8::new(128, 64, 0)
        );
        assert_eq!(Color::RED.set_brightness(0).to_rgb8(), RGB8::new(0, 0, 0));
        assert_eq!(Color::TRANSPARENT.to_rgb8(), RGB8::default());
    }
}
