mod tests {
    use embassy_time::Instant;
    use myrtio_strip_controller::color::{BLACK, GREEN, Hsv, RED, Rgb, hsv2rgb, white};
    use myrtio_strip_controller::pattern::{
        ChasePattern, CheckerStage, Pattern, PatternId, RainbowPattern, RgbCheckerPattern,
    };
    use myrtio_strip_controller::{PersistedConfig, StripState};

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    fn strip(max_leds: u16) -> StripState {
        StripState::new(max_leds, PersistedConfig::defaults(max_leds))
    }

    #[test]
    fn test_pattern_id_round_trip() {
        for id in PatternId::ALL {
            assert_eq!(PatternId::from_raw(id.raw()), Some(id));
            assert_eq!(PatternId::parse_from_str(id.as_str()), Some(id));
            assert_eq!(id.to_slot().id(), id);
        }
        assert_eq!(PatternId::from_raw(3), None);
        assert_eq!(PatternId::parse_from_str("aurora"), None);
        assert_eq!(PatternId::default(), PatternId::Rainbow);
    }

    #[test]
    fn test_rainbow_advances_phase_every_call() {
        let mut state = strip(10);
        let mut leds = [Rgb::default(); 10];
        let mut rainbow = RainbowPattern::default();

        for expected in 1..=3u8 {
            assert!(rainbow.advance(at(0), &mut state, &mut leds));
            assert_eq!(state.animation_phase, expected);
        }
        let hue = |hue| hsv2rgb(Hsv {
            hue,
            sat: 255,
            val: 255,
        });
        assert_eq!(leds[0], hue(3));
        assert_eq!(leds[1], hue(3 + 7));
        assert_eq!(leds[9], hue(3 + 63));
    }

    #[test]
    fn test_rainbow_phase_wraps() {
        let mut state = strip(4);
        state.animation_phase = 255;
        let mut leds = [Rgb::default(); 4];
        RainbowPattern::default()
            .with_phase_step(2)
            .advance(at(0), &mut state, &mut leds);
        assert_eq!(state.animation_phase, 1);
    }

    #[test]
    fn test_checker_timeline() {
        let mut state = strip(5);
        let mut leds = [Rgb::default(); 5];
        let mut checker = RgbCheckerPattern::default();

        // (time, changed, stage, lit)
        let timeline = [
            (0, true, CheckerStage::Red, true),
            (499, false, CheckerStage::Red, true),
            (500, true, CheckerStage::Red, false),
            (750, false, CheckerStage::Red, false),
            (1349, false, CheckerStage::Red, false),
            (1350, true, CheckerStage::Green, true),
            (1850, true, CheckerStage::Green, false),
            (2100, true, CheckerStage::Green, true),
            (2600, true, CheckerStage::Green, false),
            (2850, false, CheckerStage::Green, false),
            (3450, true, CheckerStage::Blue, true),
        ];
        for (ms, changed, stage, lit) in timeline {
            assert_eq!(
                checker.advance(at(ms), &mut state, &mut leds),
                changed,
                "at {ms} ms"
            );
            assert_eq!(checker.stage(), stage, "at {ms} ms");
            assert_eq!(checker.is_lit(), lit, "at {ms} ms");
        }
        assert_eq!(leds[4], checker.stage().color());
    }

    #[test]
    fn test_checker_pulse_counts_per_stage() {
        let mut state = strip(2);
        let mut leds = [Rgb::default(); 2];
        let mut checker = RgbCheckerPattern::default();

        let mut pulses = [0u8; 3];
        let mut was_lit = false;
        // Two full rounds at a 10 ms cycle
        for ms in (0..12_000).step_by(10) {
            checker.advance(at(ms), &mut state, &mut leds);
            if checker.is_lit() && !was_lit {
                pulses[checker.stage() as usize] += 1;
                assert_eq!(leds[0], checker.stage().color());
            }
            if !checker.is_lit() {
                assert_eq!(leds[0], BLACK);
            }
            was_lit = checker.is_lit();
        }
        assert!(pulses[0] >= 2 && pulses[0] <= 3);
        assert_eq!(pulses[1] % 2, 0);
        assert_eq!(pulses[2] % 3, 0);
    }

    #[test]
    fn test_checker_reset_starts_over() {
        let mut state = strip(3);
        let mut leds = [Rgb::default(); 3];
        let mut checker = RgbCheckerPattern::default();
        checker.advance(at(0), &mut state, &mut leds);
        checker.advance(at(500), &mut state, &mut leds);
        assert_eq!(checker.pulse_count(), 1);

        checker.reset();
        assert_eq!(checker.pulse_count(), 0);
        assert!(checker.advance(at(600), &mut state, &mut leds));
        assert_eq!(leds[0], RED);
        assert_ne!(leds[0], GREEN);
    }

    #[test]
    fn test_chase_initial_frame() {
        let mut state = strip(150);
        let mut leds = [Rgb::default(); 150];
        let mut chase = ChasePattern::default();

        assert!(chase.advance(at(0), &mut state, &mut leds));
        assert_eq!(chase.position(), 0.0);
        assert_eq!(leds[0], white(255));
        assert_eq!(leds[75], white(0));
        // Circular distance: the last pixel is one away from the first
        assert_eq!(leds[149], white(155));
    }

    #[test]
    fn test_chase_single_step() {
        let mut state = strip(150);
        let mut leds = [Rgb::default(); 150];
        let mut chase = ChasePattern::default();
        chase.advance(at(0), &mut state, &mut leds);

        assert!(!chase.advance(at(1), &mut state, &mut leds));
        assert!(chase.advance(at(2), &mut state, &mut leds));
        assert!((chase.position() - 0.1).abs() < 1e-4);
        assert_eq!(leds[0], white(245));
        assert_eq!(leds[1], white(165));
    }

    #[test]
    fn test_chase_catches_up_missed_steps() {
        let mut state = strip(150);
        let mut leds = [Rgb::default(); 150];
        let mut chase = ChasePattern::default();
        chase.advance(at(0), &mut state, &mut leds);

        chase.advance(at(21), &mut state, &mut leds);
        assert!((chase.position() - 1.0).abs() < 1e-3);

        // The odd millisecond is kept for the next step
        chase.advance(at(22), &mut state, &mut leds);
        assert!((chase.position() - 1.1).abs() < 1e-3);
    }

    #[test]
    fn test_chase_drops_stale_backlog() {
        let mut state = strip(150);
        let mut leds = [Rgb::default(); 150];
        let mut chase = ChasePattern::default();
        chase.advance(at(0), &mut state, &mut leds);

        chase.advance(at(1000), &mut state, &mut leds);
        assert!((chase.position() - 6.4).abs() < 1e-3);
        assert!(!chase.advance(at(1001), &mut state, &mut leds));
    }

    #[test]
    fn test_chase_wraps_around_strip() {
        let mut state = strip(10);
        let mut leds = [Rgb::default(); 10];
        let mut chase = ChasePattern::default();
        chase.advance(at(0), &mut state, &mut leds);

        for step in 1..=101u64 {
            chase.advance(at(step * 2), &mut state, &mut leds);
        }
        assert!(chase.position() < 10.0);
        assert!((chase.position() - 0.1).abs() < 1e-2);
    }

    #[test]
    fn test_chase_fade_rate() {
        let chase = ChasePattern::default().with_fade_rate(50.0);
        assert_eq!(chase.level_at(0, 20), 255);
        assert_eq!(chase.level_at(2, 20), 155);
        assert_eq!(chase.level_at(18, 20), 155);
        assert_eq!(chase.level_at(10, 20), 0);
    }
}
