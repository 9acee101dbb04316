mod tests {
    use myrtio_light_compositor::{DeviceConfiguration, ScaledAverage, SharedDeviceConfiguration};

    fn device_at(update_rate_ms: f64) -> SharedDeviceConfiguration {
        let device = SharedDeviceConfiguration::new(DeviceConfiguration::new(10, 1.0).unwrap());
        device.set_update_rate(update_rate_ms, 0.0).unwrap();
        device
    }

    #[test]
    fn test_weight_multiplier() {
        let device = device_at(50.0);
        let filter = ScaledAverage::new(device.read_only(), 92.857_142_857).unwrap();
        assert!((filter.weight_multiplier() - 0.7).abs() < 0.001);

        let filter = ScaledAverage::new(device.read_only(), 150.0).unwrap();
        assert!((filter.weight_multiplier() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_short_time_constant_jumps() {
        let device = device_at(50.0);
        let filter = ScaledAverage::new(device.read_only(), 20.0).unwrap();
        assert!((filter.weight_multiplier() - 1.0).abs() < f64::EPSILON);
        assert!((filter.filter(0.0, 42.0) - 42.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unknown_update_rate_jumps() {
        let device = DeviceConfiguration::new(10, 1.0).unwrap();
        let filter = ScaledAverage::new(device.into(), 500.0).unwrap();
        assert!((filter.weight_multiplier() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_follows_device_rate() {
        let device = device_at(50.0);
        let filter = ScaledAverage::new(device.read_only(), 150.0).unwrap();
        assert!((filter.weight_multiplier() - 0.5).abs() < 1e-12);

        device.set_update_rate(150.0, 0.0).unwrap();
        assert!((filter.weight_multiplier() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_integer_filters_step_towards_target() {
        let device = device_at(50.0);
        let filter = ScaledAverage::new(device.read_only(), 150.0).unwrap();
        assert_eq!(filter.filter_u8(0, 100), 50);
        assert_eq!(filter.filter_u8(100, 0), 50);
        assert_eq!(filter.filter_u8(10, 11), 11);
        assert_eq!(filter.filter_u8(11, 10), 10);
        assert_eq!(filter.filter_i32(-10, 10), 0);
    }

    #[test]
    fn test_converges_without_overshoot() {
        let device = device_at(10.0);
        let filter = ScaledAverage::new(device.read_only(), 283.0).unwrap();

        let mut value = 0_u8;
        for _ in 0..500 {
            let next = filter.filter_u8(value, 200);
            assert!(next >= value);
            assert!(next <= 200);
            value = next;
        }
        assert_eq!(value, 200);

        let mut real = 0.0;
        for _ in 0..50 {
            let next = filter.filter(real, 1.0);
            assert!(next > real && next < 1.0);
            real = next;
        }
    }

    #[test]
    fn test_negative_time_constant() {
        let device = device_at(50.0);
        let err = ScaledAverage::new(device.read_only(), -1.0).unwrap_err();
        assert_eq!(err.param(), Some("Constant"));

        let mut filter = ScaledAverage::new(device.read_only(), 0.0).unwrap();
        let err = filter.set_time_constant(f64::NAN).unwrap_err();
        assert_eq!(err.param(), Some("TimeConstant"));
        filter.set_time_constant(300.0).unwrap();
        assert!((filter.time_constant() - 300.0).abs() < f64::EPSILON);
    }
}
