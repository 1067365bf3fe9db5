mod common;

mod tests {
    use embassy_time::Duration;
    use myrtio_strip_controller::input::{
        ButtonId, ButtonPins, Command, CommandChannel, CommandDecoder, Debouncer, Edge,
        EncoderDirection, EncoderReader, InputManager, QuadratureDecoder, QuadratureState,
        SharedEncoderCounter, decode_step, line_code,
    };

    use crate::common::{FakePin, at};

    const DELAY: Duration = Duration::from_millis(50);

    #[test]
    fn test_debounce_commits_after_stable_delay() {
        let mut debouncer = Debouncer::new(DELAY, at(0));
        assert_eq!(debouncer.update(at(0), false), None);
        assert_eq!(debouncer.update(at(49), false), None);
        assert_eq!(debouncer.update(at(50), false), Some(Edge::Pressed));
        assert!(!debouncer.is_high());
        assert_eq!(debouncer.update(at(60), false), None);
    }

    #[test]
    fn test_debounce_bounce_restarts_timer() {
        let mut debouncer = Debouncer::new(DELAY, at(0));
        debouncer.update(at(0), false);
        debouncer.update(at(10), true);
        debouncer.update(at(20), false);
        assert_eq!(debouncer.update(at(60), false), None);
        assert_eq!(debouncer.update(at(70), false), Some(Edge::Pressed));
    }

    #[test]
    fn test_debounce_short_glitch_is_ignored() {
        let mut debouncer = Debouncer::new(DELAY, at(0));
        debouncer.update(at(0), false);
        debouncer.update(at(30), true);
        for ms in (30..200).step_by(10) {
            assert_eq!(debouncer.update(at(ms), true), None);
        }
        assert!(debouncer.is_high());
    }

    #[test]
    fn test_debounce_release_never_reports_pressed() {
        let mut debouncer = Debouncer::new(DELAY, at(0));
        debouncer.update(at(0), false);
        assert_eq!(debouncer.update(at(50), false), Some(Edge::Pressed));
        debouncer.update(at(100), true);
        assert_eq!(debouncer.update(at(150), true), Some(Edge::Released));
        assert_eq!(debouncer.update(at(400), true), None);
    }

    #[test]
    fn test_quadrature_table() {
        let clockwise = [0b00, 0b10, 0b11, 0b01, 0b00];
        for pair in clockwise.windows(2) {
            assert_eq!(decode_step(pair[0], pair[1]), 1);
            assert_eq!(decode_step(pair[1], pair[0]), -1);
        }
        // No movement and skipped codes count nothing
        for code in 0..4 {
            assert_eq!(decode_step(code, code), 0);
        }
        assert_eq!(decode_step(0b00, 0b11), 0);
        assert_eq!(decode_step(0b01, 0b10), 0);
        assert_eq!(line_code(true, false), 0b10);
    }

    #[test]
    fn test_quadrature_state_counts_full_cycle() {
        let mut state = QuadratureState::new(false, false);
        for (a, b) in [(true, false), (true, true), (false, true), (false, false)] {
            state.update(a, b);
        }
        assert_eq!(state.count(), 4);

        for (a, b) in [(false, true), (true, true), (true, false), (false, false)] {
            state.update(a, b);
        }
        assert_eq!(state.count(), 0);
    }

    #[test]
    fn test_quadrature_decoder_reads_pins() {
        let a = FakePin::new(false);
        let b = FakePin::new(false);
        let decoder = QuadratureDecoder::new(a.clone(), b.clone());
        let mut reader = EncoderReader::new(decoder, EncoderDirection::Normal, 1);

        a.set_high(true);
        assert_eq!(reader.delta(), 1);
        b.set_high(true);
        assert_eq!(reader.delta(), 1);
        assert_eq!(reader.delta(), 0);
    }

    #[test]
    fn test_quadrature_decoder_survives_read_errors() {
        let a = FakePin::new(true);
        let b = FakePin::new(false);
        a.set_failing(true);
        // Line A is taken as low when it cannot be read at startup
        let decoder = QuadratureDecoder::new(a.clone(), b.clone());
        let mut reader = EncoderReader::new(decoder, EncoderDirection::Normal, 1);

        // Failed samples leave the count alone
        b.set_high(true);
        assert_eq!(reader.delta(), 0);
        b.set_high(false);

        a.set_failing(false);
        assert_eq!(reader.delta(), 1);
        assert_eq!(reader.delta(), 0);
    }

    #[test]
    fn test_encoder_delta_is_consumed_once() {
        let counter = SharedEncoderCounter::new();
        let mut reader = EncoderReader::new(&counter, EncoderDirection::Normal, 1);
        counter.add(3);
        assert_eq!(reader.delta(), 3);
        assert_eq!(reader.delta(), 0);
    }

    #[test]
    fn test_encoder_delta_across_counter_wrap() {
        let counter = SharedEncoderCounter::new();
        let mut reader = EncoderReader::new(&counter, EncoderDirection::Normal, 1);
        counter.add(i32::MAX);
        assert_eq!(reader.delta(), i32::MAX);

        counter.add(2);
        assert_eq!(reader.delta(), 2);
        counter.add(-3);
        assert_eq!(reader.delta(), -3);
    }

    #[test]
    fn test_encoder_inverted_direction() {
        let counter = SharedEncoderCounter::new();
        let mut reader = EncoderReader::new(&counter, EncoderDirection::Inverted, 1);
        counter.add(2);
        assert_eq!(reader.delta(), -2);
        counter.add(-5);
        assert_eq!(reader.delta(), 5);
    }

    #[test]
    fn test_encoder_starts_from_current_count() {
        let counter = SharedEncoderCounter::new();
        counter.store(1000);
        let mut reader = EncoderReader::new(&counter, EncoderDirection::Normal, 1);
        assert_eq!(reader.delta(), 0);
        counter.add(1);
        assert_eq!(reader.delta(), 1);
    }

    #[test]
    fn test_encoder_keeps_partial_steps() {
        let counter = SharedEncoderCounter::new();
        let mut reader = EncoderReader::new(&counter, EncoderDirection::Normal, 4);
        counter.add(3);
        assert_eq!(reader.delta(), 0);
        counter.add(1);
        assert_eq!(reader.delta(), 1);
        counter.add(-3);
        assert_eq!(reader.delta(), 0);
        counter.add(-1);
        assert_eq!(reader.delta(), -1);
    }

    #[test]
    fn test_encoder_total_does_not_depend_on_cycle_split() {
        let chunks = [1, 2, 3, 5, 7, 11, 8];
        let total: i32 = chunks.iter().sum();

        let counter = SharedEncoderCounter::new();
        let mut reader = EncoderReader::new(&counter, EncoderDirection::Normal, 4);
        let mut steps = 0;
        for chunk in chunks {
            counter.add(chunk);
            steps += reader.delta();
        }
        assert_eq!(steps, total / 4);

        let counter = SharedEncoderCounter::new();
        let mut reader = EncoderReader::new(&counter, EncoderDirection::Normal, 4);
        counter.add(total);
        assert_eq!(reader.delta(), steps);
    }

    #[test]
    fn test_command_decoder() {
        let mut decoder = CommandDecoder::new();
        assert_eq!(decoder.decode(b'3'), Some(Command::SelectIndex(3)));
        assert_eq!(decoder.decode(b'+'), Some(Command::Step(1)));
        assert_eq!(decoder.decode(b'-'), Some(Command::Step(-1)));
        assert_eq!(decoder.decode(b'b'), Some(Command::Select));
        assert_eq!(decoder.decode(b'B'), Some(Command::Select));
        assert_eq!(decoder.decode(b'x'), None);
    }

    #[test]
    fn test_command_decoder_enter_variants() {
        let selects = |bytes: &[u8]| {
            let mut decoder = CommandDecoder::new();
            bytes
                .iter()
                .filter(|byte| decoder.decode(**byte) == Some(Command::Select))
                .count()
        };
        assert_eq!(selects(b"\r\n"), 1);
        assert_eq!(selects(b"\n"), 1);
        assert_eq!(selects(b"\r"), 1);
        assert_eq!(selects(b"\n\r"), 2);
        assert_eq!(selects(b"\r\r\n"), 2);
        assert_eq!(selects(b"\r\nb\r\n"), 3);
    }

    #[test]
    fn test_command_channel_is_bounded() {
        let channel: CommandChannel<2> = CommandChannel::new();
        let sender = channel.sender();
        assert!(sender.try_send(b'1').is_ok());
        assert!(sender.try_send(b'2').is_ok());
        assert_eq!(sender.try_send(b'3').map_err(|err| err.0), Err(b'3'));

        let receiver = channel.receiver();
        assert_eq!(receiver.try_receive(), Some(b'1'));
        assert_eq!(receiver.try_receive(), Some(b'2'));
        assert_eq!(receiver.try_receive(), None);
    }

    #[test]
    fn test_input_manager_merges_sources() {
        let select = FakePin::new(true);
        let user = FakePin::new(true);
        let boot = FakePin::new(true);
        let counter = SharedEncoderCounter::new();
        let channel: CommandChannel<16> = CommandChannel::new();
        let mut input = InputManager::new(
            ButtonPins {
                select: select.clone(),
                user: user.clone(),
                boot,
            },
            EncoderReader::new(&counter, EncoderDirection::Normal, 1),
            channel.receiver(),
            DELAY,
            at(0),
        );

        let event = input.poll(at(0));
        assert!(!event.is_interaction());

        counter.add(2);
        channel.sender().send_str("+\r\n").unwrap();
        let event = input.poll(at(10));
        assert_eq!(event.encoder_delta, 2);
        assert_eq!(event.serial_steps, 1);
        assert!(event.pressed(ButtonId::Select));
        assert!(event.serial_activity);

        let event = input.poll(at(20));
        assert!(!event.is_interaction());

        user.set_high(false);
        assert!(!input.poll(at(30)).pressed(ButtonId::User));
        let event = input.poll(at(80));
        assert!(event.pressed(ButtonId::User));
        assert!(!event.pressed(ButtonId::Select));
        assert!(!input.poll(at(90)).is_interaction());
    }

    #[test]
    fn test_input_manager_digit_jump() {
        let channel: CommandChannel<16> = CommandChannel::new();
        let counter = SharedEncoderCounter::new();
        let mut input = InputManager::new(
            ButtonPins {
                select: FakePin::new(true),
                user: FakePin::new(true),
                boot: FakePin::new(true),
            },
            EncoderReader::new(&counter, EncoderDirection::Normal, 1),
            channel.receiver(),
            DELAY,
            at(0),
        );

        channel.sender().send_str("7").unwrap();
        let event = input.poll(at(0));
        assert_eq!(event.menu_jump, Some(7));
        assert_eq!(event.encoder_delta, 0);
        assert_eq!(event.serial_steps, 0);

        channel.sender().send_str("?").unwrap();
        let event = input.poll(at(10));
        assert!(event.serial_activity);
        assert!(event.is_interaction());
        assert_eq!(event.menu_jump, None);
    }
}
