// server/src/cli/commands.rs

// Command-line arguments and subcommands for the Suvera CLI.
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "suvera")]
#[command(version = "0.1.0")]
#[command(about = "Emergency triage and hospital routing")]
pub struct CliArgs {
    /// Configuration file (defaults to ./suvera.toml when present)
    #[arg(long, global = true, env = "SUVERA_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: SuveraCommands,
}

#[derive(Subcommand, Debug)]
pub enum SuveraCommands {
    /// Classify symptoms and route to hospitals
    Triage(TriageArgs),
    /// Skip classification and find the nearest hospital
    Sos(SosArgs),
    /// List hospitals for a department and show the route to one
    Discover(DiscoverArgs),
    /// Send an admission request and wait for the hospital's answer
    Request(RequestArgs),
    /// Hospital-side request queue
    Hospital {
        #[command(subcommand)]
        action: HospitalAction,
    },
    /// Run the symptom analyzer service
    Analyzer {
        #[command(subcommand)]
        action: AnalyzerAction,
    },
}

/// Current position. Falls back to `[location]` in the configuration.
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct LocationArgs {
    #[arg(long, requires = "lng", allow_negative_numbers = true)]
    pub lat: Option<f64>,
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lng: Option<f64>,
}

#[derive(Args, Debug)]
pub struct TriageArgs {
    /// Symptoms as text
    #[arg(long, conflicts_with = "audio", required_unless_present = "audio")]
    pub text: Option<String>,
    /// WAV clip to replay as if recorded (capped at the capture window)
    #[arg(long, value_name = "FILE")]
    pub audio: Option<PathBuf>,
    /// Language hint sent to the analyzer, e.g. "ta"
    #[arg(long)]
    pub language: Option<String>,
    /// Patient name, for a logged-in session
    #[arg(long, requires = "contact")]
    pub login_as: Option<String>,
    #[arg(long, requires = "login_as")]
    pub contact: Option<String>,
    #[command(flatten)]
    pub location: LocationArgs,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SosKindArg {
    /// Ambulance / trauma care
    Trauma,
    /// Nearest general hospital
    General,
}

#[derive(Args, Debug)]
pub struct SosArgs {
    #[arg(long, value_enum)]
    pub kind: SosKindArg,
    #[command(flatten)]
    pub location: LocationArgs,
}

#[derive(Args, Debug)]
pub struct DiscoverArgs {
    #[arg(long)]
    pub department: String,
    /// Hospital to route to instead of the first result
    #[arg(long, value_name = "HOSPITAL_ID")]
    pub select: Option<String>,
    #[command(flatten)]
    pub location: LocationArgs,
}

#[derive(Args, Debug)]
pub struct RequestArgs {
    #[arg(long)]
    pub department: String,
    #[arg(long)]
    pub hospital_id: String,
    #[arg(long, requires = "contact")]
    pub name: Option<String>,
    #[arg(long, requires = "name")]
    pub contact: Option<String>,
    #[arg(long)]
    pub symptoms: Option<String>,
    #[command(flatten)]
    pub location: LocationArgs,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum HospitalAction {
    /// Show pending requests
    Queue {
        #[arg(long)]
        hospital_id: String,
        /// Keep refreshing until Ctrl-C
        #[arg(long)]
        watch: bool,
    },
    /// Accept a pending request
    Accept {
        #[arg(long)]
        hospital_id: String,
        #[arg(long)]
        request_id: String,
    },
    /// Decline a pending request
    Decline {
        #[arg(long)]
        hospital_id: String,
        #[arg(long)]
        request_id: String,
    },
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum AnalyzerAction {
    /// Run the symptom analyzer service
    Start {
        #[arg(long)]
        host: Option<String>,
        #[arg(long, short = 'p')]
        port: Option<u16>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triage_takes_text_or_audio_but_not_both() {
        let args = CliArgs::try_parse_from(["suvera", "triage", "--text", "chest pain", "--lat", "13.08", "--lng", "80.27"]).unwrap();
        let SuveraCommands::Triage(triage) = args.command else { panic!("expected triage") };
        assert_eq!(triage.text.as_deref(), Some("chest pain"));
        assert_eq!(triage.location, LocationArgs { lat: Some(13.08), lng: Some(80.27) });

        assert!(CliArgs::try_parse_from(["suvera", "triage"]).is_err());
        assert!(CliArgs::try_parse_from(["suvera", "triage", "--text", "x", "--audio", "a.wav"]).is_err());
    }

    #[test]
    fn negative_coordinates_parse() {
        let args = CliArgs::try_parse_from(["suvera", "sos", "--kind", "trauma", "--lat", "-33.86", "--lng", "151.2"]).unwrap();
        let SuveraCommands::Sos(sos) = args.command else { panic!("expected sos") };
        assert_eq!(sos.kind, SosKindArg::Trauma);
        assert_eq!(sos.location.lat, Some(-33.86));
    }

    #[test]
    fn hospital_decisions_need_both_ids() {
        let args = CliArgs::try_parse_from(["suvera", "hospital", "accept", "--hospital-id", "3", "--request-id", "41"]).unwrap();
        assert!(matches!(args.command, SuveraCommands::Hospital { action: HospitalAction::Accept { .. } }));
        assert!(CliArgs::try_parse_from(["suvera", "hospital", "decline", "--hospital-id", "3"]).is_err());
    }
}
