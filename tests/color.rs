mod tests {
    use myrtio_light_compositor::{BlendMode, Color, Error};

    const LOWER: Color = Color::with_brightness(65, 128, 64, 32);
    const UPPER: Color = Color::with_brightness(64, 128, 255, 100);

    #[test]
    fn test_constructors() {
        let color = Color::new(1, 2, 3);
        assert_eq!(color.brightness(), 255);
        assert_eq!((color.r(), color.g(), color.b()), (1, 2, 3));

        let derived = Color::derived(100, 128, 64);
        assert_eq!(derived.brightness(), 128);
        assert_eq!(Color::derived(0, 0, 0).brightness(), 0);

        assert_eq!(Color::default(), Color::BLACK);
        assert_eq!(Color::BLACK.brightness(), 255);
        assert_eq!(Color::TRANSPARENT, Color::with_brightness(0, 0, 0, 0));
    }

    #[test]
    fn test_builders_return_new_values() {
        let base = Color::RED;
        let changed = base.with_g(10).with_b(20).set_brightness(30);
        assert_eq!(base, Color::new(255, 0, 0));
        assert_eq!(changed, Color::with_brightness(255, 10, 20, 30));
        assert_eq!(changed.with_r(0).r(), 0);
    }

    #[test]
    fn test_has_effect() {
        assert!(!Color::TRANSPARENT.has_effect());
        assert!(Color::BLACK.has_effect());
        assert!(Color::with_brightness(1, 0, 0, 0).has_effect());
    }

    #[test]
    fn test_named_colors() {
        assert_eq!(Color::named("azure"), Some(Color::AZURE));
        assert_eq!(Color::named("  Orange "), Some(Color::ORANGE));
        assert_eq!(Color::named("TRANSPARENT"), Some(Color::TRANSPARENT));
        assert_eq!(Color::named("mauve"), None);
    }

    #[test]
    fn test_combine_with_opacity() {
        assert_eq!(
            LOWER.blend_opacity(UPPER, 0.5).unwrap(),
            Color::with_brightness(65, 128, 127, 50)
        );
        assert_eq!(LOWER.blend_opacity(UPPER, 0.0).unwrap(), LOWER);
        assert_eq!(
            LOWER.blend_opacity(UPPER, 1.0).unwrap(),
            Color::with_brightness(65, 128, 255, 100)
        );
    }

    #[test]
    fn test_fade_with_opacity() {
        assert_eq!(
            LOWER.blend_opacity_with(UPPER, 0.75, true).unwrap(),
            Color::with_brightness(64, 128, 207, 83)
        );
        assert_eq!(
            LOWER.blend_opacity_with(UPPER, 0.5, true).unwrap(),
            Color::with_brightness(64, 128, 159, 66)
        );
        assert_eq!(LOWER.blend_opacity_with(UPPER, 0.0, true).unwrap(), LOWER);
        assert_eq!(LOWER.blend_opacity_with(UPPER, 1.0, true).unwrap(), UPPER);
    }

    #[test]
    fn test_fade_without_drift() {
        let start = Color::with_brightness(0, 255, 200, 2);
        let end = Color::with_brightness(0, 240, 200, 2);
        assert_eq!(
            start.blend_opacity_with(end, 0.93, true).unwrap(),
            Color::with_brightness(0, 241, 200, 2)
        );
        assert_eq!(
            start.blend_opacity_with(end, 0.015, true).unwrap(),
            Color::with_brightness(0, 254, 200, 2)
        );
    }

    #[test]
    fn test_opacity_out_of_range() {
        for opacity in [-0.1, 1.01, f64::NAN] {
            let err = LOWER.blend_opacity(UPPER, opacity).unwrap_err();
            assert!(matches!(err, Error::OutOfRange { .. }));
            assert_eq!(err.param(), Some("Opacity"));
        }
    }

    #[test]
    fn test_blend_modes() {
        assert_eq!(
            LOWER.blend(UPPER, BlendMode::Favor),
            Color::with_brightness(64, 128, 138, 58)
        );
        assert_eq!(
            LOWER.blend(UPPER, BlendMode::Combine),
            Color::with_brightness(65, 128, 255, 100)
        );
        assert_eq!(
            LOWER.blend(UPPER, BlendMode::Sum),
            Color::with_brightness(129, 255, 255, 132)
        );
        assert_eq!(LOWER.blend(UPPER, BlendMode::Replace), UPPER);
        assert_eq!(LOWER.blend(UPPER, BlendMode::Mask), UPPER);
    }

    #[test]
    fn test_transparent_upper() {
        assert_eq!(LOWER.blend(Color::TRANSPARENT, BlendMode::Favor), LOWER);
        assert_eq!(LOWER.blend(Color::TRANSPARENT, BlendMode::Mask), LOWER);
        assert_eq!(LOWER.blend(Color::TRANSPARENT, BlendMode::Combine), LOWER);
        assert_eq!(
            LOWER.blend(Color::TRANSPARENT, BlendMode::Replace),
            Color::TRANSPARENT
        );
    }

    #[test]
    fn test_blend_mode_names() {
        assert_eq!("favor".parse::<BlendMode>().unwrap(), BlendMode::Favor);
        assert_eq!("Replace".parse::<BlendMode>().unwrap(), BlendMode::Replace);
        assert!(matches!(
            "overlay".parse::<BlendMode>(),
            Err(Error::UnknownBlendMode(_))
        ));
        assert_eq!(BlendMode::default(), BlendMode::Combine);
        assert!(BlendMode::Mask.is_overriding());
        assert!(!BlendMode::Sum.is_overriding());
        assert_eq!(serde_json::to_string(&BlendMode::Sum).unwrap(), "\"sum\"");
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Color::with_brightness(5, 60, 255, 0).to_string(),
            "[Color: R=5  , G=60 , B=255, Brightness=0  ]"
        );
    }
}
