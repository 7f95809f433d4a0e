//! Property-based tests for command packet encoding.

use proptest::prelude::*;
use towerlight_core::{
    BuzzerPattern, BuzzerPitch, BuzzerRepeat, CommandPacket, LedColor, LedPattern, PACKET_LEN,
    encode_buzzer, encode_buzzer_with_pitch, encode_reset, encode_single_color, encode_tower,
};

fn led_color() -> impl Strategy<Value = LedColor> {
    prop::sample::select(LedColor::ALL.to_vec())
}

fn led_pattern() -> impl Strategy<Value = LedPattern> {
    (0u8..=0xF).prop_map(|n| LedPattern::from_nibble(n).unwrap())
}

fn buzzer_pattern() -> impl Strategy<Value = BuzzerPattern> {
    (0u8..=0xF).prop_map(|n| BuzzerPattern::from_nibble(n).unwrap())
}

fn buzzer_repeat() -> impl Strategy<Value = BuzzerRepeat> {
    (0u8..=BuzzerRepeat::MAX).prop_map(|n| BuzzerRepeat::new(n).unwrap())
}

fn buzzer_pitch() -> impl Strategy<Value = BuzzerPitch> {
    (0u8..=0xF).prop_map(|n| BuzzerPitch::from_nibble(n).unwrap())
}

fn any_packet() -> impl Strategy<Value = CommandPacket> {
    prop_oneof![
        (led_color(), led_pattern()).prop_map(|(c, p)| encode_single_color(c, p)),
        (led_pattern(), led_pattern(), led_pattern(), led_pattern(), led_pattern())
            .prop_map(|(r, y, g, b, w)| encode_tower(r, y, g, b, w)),
        (buzzer_pattern(), buzzer_repeat()).prop_map(|(p, r)| encode_buzzer(p, r)),
        (buzzer_pattern(), buzzer_repeat(), buzzer_pitch(), buzzer_pitch())
            .prop_map(|(p, r, a, b)| encode_buzzer_with_pitch(p, r, a, b)),
        Just(encode_reset()),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Version, command id and padding bytes are fixed for every command.
    #[test]
    fn prop_fixed_bytes_zero(packet in any_packet()) {
        let bytes = packet.as_bytes();
        prop_assert_eq!(bytes.len(), PACKET_LEN);
        prop_assert_eq!(bytes[0], 0x00);
        prop_assert_eq!(bytes[1], 0x00);
        prop_assert_eq!(bytes[7], 0x00);
    }

    /// The white byte never carries anything in its low nibble.
    #[test]
    fn prop_white_low_nibble_unused(packet in any_packet()) {
        prop_assert_eq!(packet.as_bytes()[6] & 0x0F, 0);
    }

    /// The selected color decodes back to its pattern; every other LED keeps.
    #[test]
    fn prop_single_color_round_trip(color in led_color(), pattern in led_pattern()) {
        let packet = encode_single_color(color, pattern);
        for other in LedColor::ALL {
            let expected = if other == color { pattern.nibble() } else { LedPattern::KEEP_NIBBLE };
            prop_assert_eq!(packet.led_nibble(other), expected, "color {} in {}", other, packet);
        }
        prop_assert_eq!(packet.buzzer_pattern_nibble(), BuzzerPattern::KEEP_NIBBLE);
    }

    /// Tower commands set every LED explicitly and leave the buzzer alone.
    #[test]
    fn prop_tower_sets_every_led(
        r in led_pattern(), y in led_pattern(), g in led_pattern(), b in led_pattern(), w in led_pattern(),
    ) {
        let packet = encode_tower(r, y, g, b, w);
        prop_assert_eq!(packet.led_nibble(LedColor::Red), r.nibble());
        prop_assert_eq!(packet.led_nibble(LedColor::Yellow), y.nibble());
        prop_assert_eq!(packet.led_nibble(LedColor::Green), g.nibble());
        prop_assert_eq!(packet.led_nibble(LedColor::Blue), b.nibble());
        prop_assert_eq!(packet.led_nibble(LedColor::White), w.nibble());
        prop_assert_eq!(packet.buzzer_pattern_nibble(), BuzzerPattern::KEEP_NIBBLE);
    }

    /// Buzzer commands carry pattern, repeat and pitches and keep every LED.
    #[test]
    fn prop_buzzer_fields(
        pattern in buzzer_pattern(), repeat in buzzer_repeat(), a in buzzer_pitch(), b in buzzer_pitch(),
    ) {
        let packet = encode_buzzer_with_pitch(pattern, repeat, a, b);
        prop_assert_eq!(packet.buzzer_pattern_nibble(), pattern.nibble());
        prop_assert_eq!(packet.buzzer_repeat_nibble(), repeat.count());
        prop_assert_eq!(packet.pitch_a_nibble(), a.nibble());
        prop_assert_eq!(packet.pitch_b_nibble(), b.nibble());
        for color in LedColor::ALL {
            prop_assert_eq!(packet.led_nibble(color), LedPattern::KEEP_NIBBLE);
        }
    }

    /// Default-pitch buzzer commands match the explicit form with the default sentinels.
    #[test]
    fn prop_buzzer_default_pitch(pattern in buzzer_pattern(), repeat in buzzer_repeat()) {
        prop_assert_eq!(
            encode_buzzer(pattern, repeat),
            encode_buzzer_with_pitch(pattern, repeat, BuzzerPitch::DefaultA, BuzzerPitch::DefaultB)
        );
    }

    /// Patterns outside a nibble are rejected rather than packed.
    #[test]
    fn prop_wide_values_rejected(n in 0x10u8..=u8::MAX) {
        prop_assert!(LedPattern::from_nibble(n).is_err());
        prop_assert!(BuzzerPattern::from_nibble(n).is_err());
        prop_assert!(BuzzerPitch::from_nibble(n).is_err());
        prop_assert!(BuzzerRepeat::new(n).is_err());
    }

    /// Only 0-4 select a color.
    #[test]
    fn prop_color_out_of_range_rejected(n in 5u8..=u8::MAX) {
        prop_assert!(LedColor::try_from(n).is_err());
    }
}
