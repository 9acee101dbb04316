mod tests {
    use std::thread;

    use embassy_time::{Duration, Instant};
    use myrtio_light_compositor::channel::{SendError, TryReceiveError, Wake, channel};

    #[test]
    fn test_messages_arrive_in_order() {
        let (sender, receiver) = channel();
        let other = sender.clone();
        sender.send(1).unwrap();
        other.send(2).unwrap();
        receiver.sender().send(3).unwrap();

        assert_eq!(receiver.try_receive(), Ok(1));
        assert_eq!(receiver.try_receive(), Ok(2));
        assert_eq!(receiver.try_receive(), Ok(3));
        assert_eq!(receiver.try_receive(), Err(TryReceiveError));
    }

    #[test]
    fn test_wait_times_out() {
        let (_sender, receiver) = channel::<u8>();
        let started = Instant::now();
        assert_eq!(receiver.wait(Duration::from_millis(20)), Wake::TimedOut);
        assert!(started.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_wait_returns_on_pending_message() {
        let (sender, receiver) = channel();
        sender.send("frame").unwrap();
        assert_eq!(receiver.wait(Duration::from_secs(10)), Wake::Message);
    }

    #[test]
    fn test_send_wakes_waiting_receiver() {
        let (sender, receiver) = channel();
        let handle = thread::spawn(move || {
            thread::sleep(std::time::Duration::from_millis(20));
            sender.send(7).unwrap();
        });
        assert_eq!(receiver.wait(Duration::from_secs(10)), Wake::Message);
        assert_eq!(receiver.try_receive(), Ok(7));
        handle.join().unwrap();
    }

    #[test]
    fn test_cancel_interrupts_sleep() {
        let (sender, receiver) = channel::<u8>();
        let handle = thread::spawn(move || {
            thread::sleep(std::time::Duration::from_millis(20));
            sender.cancel();
        });
        let started = Instant::now();
        assert!(receiver.sleep(Duration::from_secs(10)));
        assert!(started.elapsed() < Duration::from_secs(10));
        assert!(receiver.is_cancelled());
        assert_eq!(receiver.wait(Duration::from_secs(10)), Wake::Cancelled);
        handle.join().unwrap();
    }

    #[test]
    fn test_sleep_ignores_messages() {
        let (sender, receiver) = channel();
        sender.send(1).unwrap();
        assert!(!receiver.sleep(Duration::from_millis(5)));
        assert_eq!(receiver.try_receive(), Ok(1));
    }

    #[test]
    fn test_send_after_cancel_or_drop_fails() {
        let (sender, receiver) = channel();
        receiver.cancel();
        assert!(sender.is_cancelled());
        assert_eq!(sender.send(4), Err(SendError(4)));

        let (sender, receiver) = channel();
        drop(receiver);
        assert_eq!(sender.send(5), Err(SendError(5)));
    }
}
