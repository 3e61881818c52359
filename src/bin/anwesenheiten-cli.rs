#![forbid(unsafe_code)]
use anwesenheiten::{
    config::ReportConfig,
    export::{self, ExportRequest},
    io,
    table::planned_columns,
};
use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// Export des disponibilités ChurchTools (CSV / XLSX)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON de configuration (groupes, services, précédences)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Exporter les disponibilités d'une période
    Export {
        /// Jeton de login ChurchTools
        #[arg(long, env = "ANWESENHEITEN_TOKEN", hide_env_values = true)]
        token: Option<String>,
        /// Premier jour (AAAA-MM-JJ)
        #[arg(long)]
        from: NaiveDate,
        /// Dernier jour inclus (AAAA-MM-JJ)
        #[arg(long)]
        to: NaiveDate,
        /// Remplace l'URL de base de la configuration
        #[arg(long)]
        base_url: Option<String>,
        /// Fichier CSV de sortie (stdout si aucune sortie)
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Fichier XLSX de sortie
        #[arg(long)]
        xlsx: Option<PathBuf>,
    },

    /// Afficher les colonnes prévues par la configuration
    Columns,

    /// Écrire la configuration par défaut
    InitConfig {
        #[arg(long)]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .try_init();
    }

    let mut config = match &cli.config {
        Some(path) => ReportConfig::load_from_file(path)?,
        None => ReportConfig::default(),
    };

    match cli.cmd {
        Commands::Export {
            token,
            from,
            to,
            base_url,
            csv,
            xlsx,
        } => {
            if let Some(url) = base_url {
                config.base_url = url;
            }
            let request = ExportRequest::new(token.unwrap_or_default(), from, to);
            let table = export::run(&config, &request)?;

            if let Some(path) = &xlsx {
                write_xlsx(path, &table)?;
            }
            match &csv {
                Some(path) => io::export_csv(path, &table)?,
                None if xlsx.is_none() => io::write_csv(std::io::stdout().lock(), &table)?,
                None => {}
            }
            eprintln!(
                "{} event(s) x {} column(s) exported",
                table.len(),
                table.columns().len()
            );
        }
        Commands::Columns => {
            for column in planned_columns(&config) {
                println!("{}", column.header());
            }
        }
        Commands::InitConfig { out } => {
            config.save_to_file(&out)?;
            println!("config written to {}", out.display());
        }
    }

    Ok(())
}

#[cfg(feature = "xlsx")]
fn write_xlsx(path: &std::path::Path, table: &anwesenheiten::ExportTable) -> Result<()> {
    io::export_xlsx(path, table)
}

#[cfg(not(feature = "xlsx"))]
fn write_xlsx(_path: &std::path::Path, _table: &anwesenheiten::ExportTable) -> Result<()> {
    anyhow::bail!("built without the `xlsx` feature")
}
