//! Command-line definitions.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use towerlight_core::{
    BuzzerPattern, BuzzerPitch, BuzzerRepeat, CommandKind, CommandPacket, LedColor, LedPattern,
    encode_buzzer, encode_buzzer_with_pitch, encode_reset, encode_single_color, encode_tower,
};

#[derive(Debug, Parser)]
#[command(name = "towerlight")]
#[command(about = "Drive a USB stacked signal tower: LED units and buzzer")]
#[command(version)]
#[command(long_about = "
towerlight sends one command to a USB stacked signal tower and exits.

LED patterns: off, on, pattern1-pattern4, keep (or 0x0-0xF; 6-F mean keep).
Buzzer pitches: off, a6, bb6, b6, c7, db7, d7, eb7, e7, f7, gb7, g7, ab7, a7,
default-a, default-b (or 0x0-0xF).
")]
pub struct Cli {
    /// Configuration file (defaults to the platform config directory)
    #[arg(long, global = true, env = "TOWERLIGHT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Print the encoded packet instead of sending it
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Output in JSON format (packet under --dry-run, send status, detect results)
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Set one LED unit; everything else keeps its state
    Light {
        /// red, yellow, green, blue, white (or 0-4)
        color: LedColor,
        pattern: LedPattern,
    },

    /// Set all five LED units
    Tower {
        red: LedPattern,
        yellow: LedPattern,
        green: LedPattern,
        blue: LedPattern,
        white: LedPattern,
    },

    /// Sound the buzzer at the default pitches
    Buzzer {
        pattern: BuzzerPattern,
        /// 0 (continuous) or 1-15
        repeat: BuzzerRepeat,
    },

    /// Sound the buzzer with explicit pitches for notes A and B
    BuzzerPitch {
        pattern: BuzzerPattern,
        /// 0 (continuous) or 1-15
        repeat: BuzzerRepeat,
        pitch_a: BuzzerPitch,
        pitch_b: BuzzerPitch,
    },

    /// Turn off every LED unit and stop the buzzer
    Reset,

    /// Report whether a signal tower is connected
    Detect,
}

impl Commands {
    /// Packet this command sends, if it sends one.
    #[must_use]
    pub fn packet(&self) -> Option<(CommandKind, CommandPacket)> {
        let encoded = match *self {
            Self::Light { color, pattern } => (CommandKind::Light, encode_single_color(color, pattern)),
            Self::Tower { red, yellow, green, blue, white } => {
                (CommandKind::Tower, encode_tower(red, yellow, green, blue, white))
            }
            Self::Buzzer { pattern, repeat } => (CommandKind::Buzzer, encode_buzzer(pattern, repeat)),
            Self::BuzzerPitch { pattern, repeat, pitch_a, pitch_b } => (
                CommandKind::BuzzerWithPitch,
                encode_buzzer_with_pitch(pattern, repeat, pitch_a, pitch_b),
            ),
            Self::Reset => (CommandKind::Reset, encode_reset()),
            Self::Detect => return None,
        };
        Some(encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn test_parse_light_by_name() -> TestResult {
        let cli = Cli::try_parse_from(["towerlight", "light", "red", "on"])?;
        assert!(!cli.dry_run);
        assert_eq!(cli.verbose, 0);
        assert!(matches!(
            cli.command,
            Commands::Light { color: LedColor::Red, pattern: LedPattern::On }
        ));
        Ok(())
    }

    #[test]
    fn test_parse_light_by_number() -> TestResult {
        let cli = Cli::try_parse_from(["towerlight", "light", "4", "0x3"])?;
        assert!(matches!(
            cli.command,
            Commands::Light { color: LedColor::White, pattern: LedPattern::Pattern2 }
        ));
        Ok(())
    }

    #[test]
    fn test_parse_light_rejects_unknown_color() {
        assert!(Cli::try_parse_from(["towerlight", "light", "5", "on"]).is_err());
        assert!(Cli::try_parse_from(["towerlight", "light", "purple", "on"]).is_err());
    }

    #[test]
    fn test_parse_tower_packet() -> TestResult {
        let cli = Cli::try_parse_from(["towerlight", "tower", "1", "2", "3", "4", "5"])?;
        let (kind, packet) = cli.command.packet().ok_or("tower sends a packet")?;
        assert_eq!(kind, CommandKind::Tower);
        assert_eq!(packet.to_string(), "00 00 0f 00 12 34 50 00");
        Ok(())
    }

    #[test]
    fn test_parse_buzzer_pitch() -> TestResult {
        let cli = Cli::try_parse_from(["towerlight", "buzzer-pitch", "on", "3", "a6", "default-b"])?;
        let (kind, packet) = cli.command.packet().ok_or("buzzer-pitch sends a packet")?;
        assert_eq!(kind, CommandKind::BuzzerWithPitch);
        assert_eq!(packet.buzzer_control(), 0x31);
        assert_eq!(packet.buzzer_pitch(), 0x1F);
        Ok(())
    }

    #[test]
    fn test_parse_buzzer_rejects_repeat_overflow() {
        assert!(Cli::try_parse_from(["towerlight", "buzzer", "on", "16"]).is_err());
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() -> TestResult {
        let cli = Cli::try_parse_from(["towerlight", "reset", "--dry-run", "--json", "-vv"])?;
        assert!(cli.dry_run);
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        Ok(())
    }

    #[test]
    fn test_detect_sends_nothing() -> TestResult {
        let cli = Cli::try_parse_from(["towerlight", "detect"])?;
        assert!(cli.command.packet().is_none());
        Ok(())
    }
}
