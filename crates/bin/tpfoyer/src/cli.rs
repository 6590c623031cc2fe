//! Command-line surface: argument parsing and dispatch onto [`BlocService`].

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;

use tpfoyer_app::ports::BlocRepository;
use tpfoyer_app::services::bloc_service::BlocService;
use tpfoyer_domain::bloc::Bloc;
use tpfoyer_domain::chambre::{Chambre, TypeChambre};
use tpfoyer_domain::error::TpFoyerError;
use tpfoyer_domain::id::{BlocId, FoyerId};

#[derive(Debug, Parser)]
#[command(author, version, about = "Manage dormitory blocs", long_about = None)]
pub struct Cli {
    /// TOML configuration file; defaults to `tpfoyer.toml` when present
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List every bloc
    List,

    /// List blocs with strictly more places than the threshold
    Above {
        #[arg(allow_negative_numbers = true)]
        threshold: i64,
    },

    /// Show one bloc
    Get { id: BlocId },

    /// Create a bloc
    Add {
        nom: String,
        capacite: u32,
        /// Attach the bloc to this foyer
        #[arg(long)]
        foyer: Option<FoyerId>,
        /// Room given as `NUMERO:TYPE`, e.g. `101:SIMPLE` (repeatable)
        #[arg(long = "chambre", value_parser = parse_chambre)]
        chambres: Vec<Chambre>,
    },

    /// Change fields of an existing bloc
    Modify {
        id: BlocId,
        #[arg(long)]
        nom: Option<String>,
        #[arg(long)]
        capacite: Option<u32>,
        #[arg(long, conflicts_with = "detach")]
        foyer: Option<FoyerId>,
        /// Remove the bloc from its foyer
        #[arg(long)]
        detach: bool,
    },

    /// Delete a bloc and its rooms
    Remove { id: BlocId },

    /// List blocs not attached to any foyer
    WithoutFoyer,

    /// List blocs matching a name and a capacity exactly
    Find { nom: String, capacite: u32 },
}

fn parse_chambre(value: &str) -> Result<Chambre, String> {
    let (numero, kind) = value
        .split_once(':')
        .ok_or_else(|| format!("expected NUMERO:TYPE, got {value:?}"))?;
    let numero = numero
        .parse::<i64>()
        .map_err(|err| format!("invalid room number {numero:?}: {err}"))?;
    let kind = kind
        .to_ascii_uppercase()
        .parse::<TypeChambre>()
        .map_err(|err| err.to_string())?;
    Ok(Chambre::new(numero, kind))
}

/// Result of a command, printed as JSON.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Output {
    Blocs(Vec<Bloc>),
    Bloc(Box<Bloc>),
    Removed { removed: BlocId },
}

impl Output {
    /// Render as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Execute `command` against the service.
///
/// # Errors
///
/// Returns whatever error the service reports.
pub async fn run<R: BlocRepository>(
    service: &BlocService<R>,
    command: Command,
) -> Result<Output, TpFoyerError> {
    let output = match command {
        Command::List => Output::Blocs(service.retrieve_all_blocs().await?),
        Command::Above { threshold } => {
            Output::Blocs(service.retrieve_blocs_selon_capacite(threshold).await?)
        }
        Command::Get { id } => Output::Bloc(Box::new(service.retrieve_bloc(id).await?)),
        Command::Add {
            nom,
            capacite,
            foyer,
            chambres,
        } => {
            let mut builder = Bloc::builder().nom_bloc(nom).capacite_bloc(capacite);
            if let Some(foyer) = foyer {
                builder = builder.foyer(foyer);
            }
            for chambre in chambres {
                builder = builder.chambre(chambre);
            }
            Output::Bloc(Box::new(service.add_bloc(builder.build()?).await?))
        }
        Command::Modify {
            id,
            nom,
            capacite,
            foyer,
            detach,
        } => {
            let mut bloc = service.retrieve_bloc(id).await?;
            if let Some(nom) = nom {
                bloc.nom_bloc = nom;
            }
            if let Some(capacite) = capacite {
                bloc.capacite_bloc = capacite;
            }
            if detach {
                bloc.foyer = None;
            } else if foyer.is_some() {
                bloc.foyer = foyer;
            }
            Output::Bloc(Box::new(service.modify_bloc(bloc).await?))
        }
        Command::Remove { id } => {
            service.remove_bloc(id).await?;
            Output::Removed { removed: id }
        }
        Command::WithoutFoyer => Output::Blocs(service.trouver_blocs_sans_foyer().await?),
        Command::Find { nom, capacite } => {
            Output::Blocs(service.trouver_blocs_par_nom_et_cap(&nom, capacite).await?)
        }
    };
    Ok(output)
}
