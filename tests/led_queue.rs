mod tests {
    use embassy_time::Duration;
    use myrtio_light_compositor::{
        BlendMode, Color, DeviceConfiguration, Layer, LedQueue, SimpleFadeAnimation,
    };

    fn frame(color: Color) -> Layer {
        Layer::filled(4, BlendMode::Combine, color).unwrap()
    }

    #[test]
    fn test_new_queue() {
        let queue = LedQueue::new(4, false).unwrap();
        assert_eq!(queue.light_count(), 4);
        assert!(queue.is_empty());
        assert_eq!(queue.lights(), &frame(Color::BLACK));
        assert_eq!(queue.last_processed(), &frame(Color::BLACK));
        assert!(!queue.lights_have_no_effect());

        let clear = LedQueue::new(4, true).unwrap();
        assert!(clear.lights_have_no_effect());
        assert!(LedQueue::new(0, true).is_err());
    }

    #[test]
    fn test_fifo_order_and_mode_stamp() {
        let mut queue = LedQueue::new(4, true).unwrap();
        queue.push_frame(&frame(Color::RED)).unwrap();
        queue.push_frame(&frame(Color::GREEN)).unwrap();
        queue.set_blend_mode(BlendMode::Mask);
        assert_eq!(queue.len(), 2);

        let first = queue.pop_frame().unwrap();
        assert_eq!(first[0], Color::RED);
        assert_eq!(first.blend_mode(), BlendMode::Mask);
        assert_eq!(queue.pop_frame().unwrap()[0], Color::GREEN);
        assert!(queue.pop_frame().is_none());
    }

    #[test]
    fn test_push_frame_count_mismatch() {
        let mut queue = LedQueue::new(4, true).unwrap();
        let err = queue.push_frame(&Layer::new(5).unwrap()).unwrap_err();
        assert_eq!(err.param(), Some("NextFrame"));
        assert!(queue.set_lights(Layer::new(3).unwrap()).is_err());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_push_current_and_last_frame() {
        let mut queue = LedQueue::new(4, true).unwrap();
        queue.push_last_frame();
        assert_eq!(queue.pop_frame().unwrap(), frame(Color::TRANSPARENT));

        queue.set_lights(frame(Color::BLUE)).unwrap();
        queue.push_current();
        queue.set_lights(frame(Color::RED)).unwrap();
        queue.push_last_frame();

        let frames = queue.drain_frames();
        assert_eq!(frames, vec![frame(Color::BLUE), frame(Color::BLUE)]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_mark_as_processed() {
        let mut queue = LedQueue::new(4, true).unwrap();
        queue.set_lights(frame(Color::CYAN)).unwrap();
        assert_eq!(queue.last_processed(), &frame(Color::TRANSPARENT));
        queue.mark_as_processed();
        assert_eq!(queue.last_processed(), &frame(Color::CYAN));

        queue.push_current();
        queue.clear_queue();
        assert!(queue.is_empty());
    }

    #[test]
    fn test_no_effect_requires_idle_queue() {
        let mut queue = LedQueue::new(4, true).unwrap();
        assert!(queue.lights_have_no_effect());

        queue.push_current();
        assert!(!queue.lights_have_no_effect());
        queue.clear_queue();

        let device = DeviceConfiguration::new(4, 1.0).unwrap();
        let animation = SimpleFadeAnimation::new(device.into()).unwrap();
        assert!(queue.set_animation(Some(Box::new(animation))).is_none());
        assert!(queue.is_animation_active());
        assert!(!queue.lights_have_no_effect());
        assert_eq!(queue.animation().map(|animation| animation.name()), Some("fade"));

        assert!(queue.take_animation().is_some());
        assert!(queue.lights_have_no_effect());
    }

    #[test]
    fn test_idle_bookkeeping() {
        let mut queue = LedQueue::new(4, true).unwrap();
        queue.add_idle_time(Duration::from_millis(3));
        queue.add_idle_time(Duration::from_millis(4));
        assert_eq!(queue.idle_time(), Duration::from_millis(7));
        queue.reset_idle_time();
        assert_eq!(queue.idle_time(), Duration::from_millis(0));

        queue.set_force_frame_request(true);
        assert!(queue.force_frame_request());
    }

    #[test]
    fn test_from_frame() {
        let queue = LedQueue::from_frame(&frame(Color::PINK));
        assert_eq!(queue.lights(), queue.last_processed());
        assert_eq!(queue.blend_mode(), BlendMode::Combine);
    }
}
