use std::time::Duration;

use clap::Parser;
use mailprobe::{BreachConfig, ProbeOptions, ValidationMode, VerifierOptions, breach};

#[derive(Parser, Debug)]
#[command(
    name = "mailprobe",
    version,
    about = "Vérifie qu'une adresse e-mail existe sans envoyer de message"
)]
pub struct Cli {
    /// adresse e-mail à vérifier
    pub email: String,

    /// mode: strict|relaxed
    #[arg(long, default_value = "strict", value_parser = ["strict", "relaxed"])]
    pub mode: String,

    /// format: human|json
    #[arg(long, default_value = "human", value_parser = ["human", "json"])]
    pub format: String,

    /// clé RapidAPI pour breachdirectory (sans clé, l'étape est ignorée)
    #[arg(long = "api-key", env = "BREACH_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// URL de l'API breachdirectory
    #[arg(long = "breach-endpoint", default_value = breach::DEFAULT_ENDPOINT)]
    pub breach_endpoint: String,

    /// n'interroge pas l'annuaire des fuites de données
    #[arg(long = "skip-breach")]
    pub skip_breach: bool,

    /// nom utilisé pour EHLO/HELO (par défaut le domaine de l'adresse)
    #[arg(long)]
    pub helo: Option<String>,

    /// enveloppe MAIL FROM (par défaut validator@domaine)
    #[arg(long = "from")]
    pub mail_from: Option<String>,

    /// port SMTP du serveur MX
    #[arg(long, default_value_t = 25)]
    pub port: u16,

    /// timeout de connexion SMTP (ms)
    #[arg(long = "connect-timeout", default_value_t = 10_000)]
    pub connect_timeout_ms: u64,

    /// timeout par commande SMTP (ms)
    #[arg(long = "command-timeout", default_value_t = 10_000)]
    pub command_timeout_ms: u64,

    /// timeout par requête DNS (ms)
    #[arg(long = "dns-timeout", default_value_t = 5_000)]
    pub dns_timeout_ms: u64,

    /// timeout de la requête HTTP breachdirectory (ms)
    #[arg(long = "breach-timeout", default_value_t = 10_000)]
    pub breach_timeout_ms: u64,

    /// logs détaillés et transcript SMTP
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn parsed_mode(&self) -> ValidationMode {
        mode_from_str(&self.mode)
    }

    pub fn dns_timeout(&self) -> Duration {
        Duration::from_millis(self.dns_timeout_ms)
    }

    pub fn verifier_options(&self) -> VerifierOptions {
        VerifierOptions {
            mode: self.parsed_mode(),
            probe: ProbeOptions {
                port: self.port,
                helo_domain: self.helo.clone(),
                envelope_sender: self.mail_from.clone(),
                connect_timeout: Duration::from_millis(self.connect_timeout_ms),
                command_timeout: Duration::from_millis(self.command_timeout_ms),
            },
        }
    }

    /// `None` when the lookup is disabled or no key is available.
    pub fn breach_config(&self) -> Option<BreachConfig> {
        if self.skip_breach {
            return None;
        }
        let key = self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())?;
        Some(BreachConfig {
            endpoint: self.breach_endpoint.clone(),
            timeout: Duration::from_millis(self.breach_timeout_ms),
            ..BreachConfig::new(key)
        })
    }
}

pub fn mode_from_str(s: &str) -> ValidationMode {
    match s {
        "relaxed" => ValidationMode::Relaxed,
        _ => ValidationMode::Strict,
    }
}
