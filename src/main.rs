//! Layer Topology Editor (CLI).
//!
//! Führt Merge- und Cut-Operationen auf GeoJSON-Dateien oder auf Layern in
//! einem Verzeichnis-Speicher aus.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use layer_topology_editor::{
    cut_polygon, merge_polygons, parse_feature_collection, write_feature_collection,
    DirectoryLayerStore, EditCommand, EditContext, EditOutcome, EngineOptions, FeatureSet, Layer,
    LayerEditController, LayerId, LayerStore, SelectionId, SourceLayer,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "layer-topology-editor")]
#[command(about = "Zusammenführen und Schneiden von Polygonen in GeoJSON-Layern")]
#[command(version)]
struct Cli {
    /// Optionen-Datei (TOML); Standard: neben der Binary
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Benachbarte Polygone einer FeatureCollection zusammenführen
    Merge {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        /// Positions-IDs, kommagetrennt (z. B. 0,3,4)
        #[arg(long, value_delimiter = ',', required = true)]
        ids: Vec<String>,
        /// Herkunft der Eingabe für das Attribut `source_layer`
        #[arg(long, value_enum, default_value = "original")]
        source_layer: SourceLayerArg,
    },

    /// Ein Polygon entlang einer Polylinie schneiden
    Cut {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        /// Positions-ID des Ziel-Polygons
        #[arg(long)]
        target: String,
        /// Schnittlinie als "x1,y1;x2,y2;..."
        #[arg(long, value_parser = parse_cut_line)]
        line: CutLine,
    },

    /// GeoJSON als neuen Layer in einen Verzeichnis-Speicher importieren
    Import {
        #[arg(long)]
        store: PathBuf,
        #[arg(long)]
        layer: String,
        /// Anzeigename (Standard: Layer-ID)
        #[arg(long)]
        name: Option<String>,
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Bearbeitungs-Command (JSON) auf einen gespeicherten Layer anwenden
    Apply {
        #[arg(long)]
        store: PathBuf,
        /// Datei mit einem `EditCommand` als JSON
        command: PathBuf,
    },

    /// Layer als GeoJSON exportieren (bearbeiteter Stand, sonst Original)
    Export {
        #[arg(long)]
        store: PathBuf,
        #[arg(long)]
        layer: String,
        #[arg(short, long)]
        output: PathBuf,
        /// Immer den Original-Stand exportieren
        #[arg(long)]
        original: bool,
    },

    /// Aktuelle Optionen als TOML schreiben
    WriteConfig {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SourceLayerArg {
    Processed,
    Original,
}

impl From<SourceLayerArg> for SourceLayer {
    fn from(value: SourceLayerArg) -> Self {
        match value {
            SourceLayerArg::Processed => SourceLayer::Processed,
            SourceLayerArg::Original => SourceLayer::Original,
        }
    }
}

/// Schnittlinie aus der Kommandozeile.
#[derive(Clone)]
struct CutLine(Vec<[f64; 2]>);

fn parse_cut_line(text: &str) -> Result<CutLine, String> {
    text.split(';')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (x, y) = pair
                .split_once(',')
                .ok_or_else(|| format!("Punkt '{}' erwartet x,y", pair))?;
            let x: f64 = x.trim().parse().map_err(|e| format!("x in '{}': {}", pair, e))?;
            let y: f64 = y.trim().parse().map_err(|e| format!("y in '{}': {}", pair, e))?;
            Ok([x, y])
        })
        .collect::<Result<Vec<_>, String>>()
        .map(CutLine)
}

fn main() -> ExitCode {
    // Logger initialisieren
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::from(2)
        }
    }
}

/// Führt den Befehl aus; `Ok(false)` bei fachlich fehlgeschlagener Bearbeitung.
fn run(cli: Cli) -> anyhow::Result<bool> {
    let config_path = cli.config.unwrap_or_else(EngineOptions::config_path);
    let options = EngineOptions::load_from_file(&config_path);

    match cli.command {
        Commands::Merge {
            input,
            output,
            ids,
            source_layer,
        } => {
            let set = read_feature_set(&input)?;
            let selection: Vec<SelectionId> =
                ids.iter().map(|id| SelectionId::from(id.as_str())).collect();
            let context = EditContext::now(source_layer.into());
            let outcome =
                EditOutcome::from_result(&set, merge_polygons(&set, &selection, &context, &options));
            finish(outcome, &output)
        }
        Commands::Cut {
            input,
            output,
            target,
            line,
        } => {
            let set = read_feature_set(&input)?;
            let target = SelectionId::from(target.as_str());
            let outcome =
                EditOutcome::from_result(&set, cut_polygon(&set, &target, &line.0, &options));
            finish(outcome, &output)
        }
        Commands::Import {
            store,
            layer,
            name,
            input,
        } => {
            let store = DirectoryLayerStore::open(store)?;
            let set = read_feature_set(&input)?;
            let name = name.unwrap_or_else(|| layer.clone());
            store.insert(Layer::new(LayerId::from(layer.as_str()), name, set))?;
            println!("Layer {} importiert", layer);
            Ok(true)
        }
        Commands::Apply { store, command } => {
            let text = std::fs::read_to_string(&command)
                .with_context(|| format!("{} nicht lesbar", command.display()))?;
            let command: EditCommand = serde_json::from_str(&text)
                .with_context(|| format!("{} ist kein gültiger Command", command.display()))?;
            let controller = LayerEditController::new(DirectoryLayerStore::open(store)?, options);
            let outcome = controller.handle_command(command)?;
            println!("{}", outcome.message);
            Ok(outcome.success)
        }
        Commands::Export {
            store,
            layer,
            output,
            original,
        } => {
            let store = DirectoryLayerStore::open(store)?;
            let layer = store.load(&LayerId::from(layer.as_str()))?;
            let set = if original {
                &layer.original
            } else {
                layer.working_set().0
            };
            write_feature_set(set, &output)?;
            println!("{} Features nach {} exportiert", set.len(), output.display());
            Ok(true)
        }
        Commands::WriteConfig { output } => {
            options.save_to_file(&output.unwrap_or(config_path))?;
            Ok(true)
        }
    }
}

fn finish(outcome: EditOutcome, output: &Path) -> anyhow::Result<bool> {
    println!("{}", outcome.message);
    if outcome.success {
        write_feature_set(&outcome.feature_set, output)?;
    }
    Ok(outcome.success)
}

fn read_feature_set(path: &Path) -> anyhow::Result<FeatureSet> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("{} nicht lesbar", path.display()))?;
    parse_feature_collection(&text).with_context(|| format!("{} fehlerhaft", path.display()))
}

fn write_feature_set(set: &FeatureSet, path: &Path) -> anyhow::Result<()> {
    std::fs::write(path, write_feature_collection(set)?)
        .with_context(|| format!("{} nicht schreibbar", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cut_line_parses_pairs() {
        let line = parse_cut_line("0,1.5; 4,1.5;").expect("gültige Linie");
        assert_eq!(line.0, vec![[0.0, 1.5], [4.0, 1.5]]);
    }

    #[test]
    fn cut_line_rejects_missing_ordinate() {
        assert!(parse_cut_line("0,1;4").is_err());
        assert!(parse_cut_line("a,1;4,1").is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
