//! Command dispatch

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use itertools::Itertools;
use tracing::instrument;

use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, project_config_path, Settings};
use crate::domain::{classify, BindableField, Scene};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;
use crate::tree_traits::TreeNodeConvert;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let project_dir = match &cli.project_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().map_err(|e| InfraError::io("current directory", e))?,
    };

    match &cli.command {
        Some(Commands::Bind {
            scene,
            assets,
            write,
        }) => cmd_bind(
            &project_dir,
            &resolve_scene(&project_dir, scene),
            assets.clone(),
            *write,
        ),
        Some(Commands::Save {
            scene,
            assets,
            paths,
        }) => cmd_save(
            &project_dir,
            &resolve_scene(&project_dir, scene),
            assets.clone(),
            paths.clone(),
        ),
        Some(Commands::Plan { scene, type_name }) => {
            cmd_plan(&project_dir, &resolve_scene(&project_dir, scene), type_name.as_deref())
        }
        Some(Commands::Tree { scene }) => cmd_tree(&project_dir, &resolve_scene(&project_dir, scene)),
        Some(Commands::Assets { assets }) => cmd_assets(&project_dir, assets.clone()),
        Some(Commands::Config { command }) => cmd_config(&project_dir, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::InvalidArgs(
            "no command given, see --help".to_string(),
        )),
    }
}

/// Relative scene paths are taken relative to the project directory.
fn resolve_scene(project_dir: &Path, scene: &Path) -> PathBuf {
    if scene.is_absolute() {
        scene.to_path_buf()
    } else {
        project_dir.join(scene)
    }
}

fn container(project_dir: &Path, assets: Option<PathBuf>) -> CliResult<ServiceContainer> {
    let settings = Settings::load(Some(project_dir))?;
    Ok(ServiceContainer::new(settings, project_dir, assets))
}

#[instrument(skip(project_dir))]
fn cmd_bind(
    project_dir: &Path,
    scene_path: &Path,
    assets: Option<PathBuf>,
    write: bool,
) -> CliResult<()> {
    let container = container(project_dir, assets)?;
    let service = container.scene_service();
    let mut loaded = service.load(scene_path)?;
    let mut binder = container.auto_binder();

    let scene = &mut loaded.scene;
    for i in scene.bind_targets() {
        binder.bind(&scene.types, &scene.hierarchy, &mut scene.targets[i]);
    }

    if write {
        service.save(scene_path, &mut loaded)?;
        output::action("Bound", &scene_path.display());
    } else {
        print_targets(&loaded.scene);
    }
    Ok(())
}

#[instrument(skip(project_dir))]
fn cmd_save(
    project_dir: &Path,
    scene_path: &Path,
    assets: Option<PathBuf>,
    paths: Vec<String>,
) -> CliResult<()> {
    let container = container(project_dir, assets)?;
    let service = container.scene_service();
    let mut loaded = service.load(scene_path)?;

    let paths = container.save_hook().on_will_save(&mut loaded.scene, paths);
    service.save(scene_path, &mut loaded)?;

    for path in paths {
        output::info(&path);
    }
    Ok(())
}

fn print_targets(scene: &Scene) {
    for i in scene.bind_targets() {
        let target = &scene.targets[i];
        let node = scene.hierarchy.path_of(target.node).unwrap_or_default();
        output::header(&format!("{} @ {}", target.type_name, node));
        for (name, value) in &target.fields {
            output::field(name, &scene.describe(value), value.is_absent());
        }
    }
}

#[instrument(skip(project_dir))]
fn cmd_plan(project_dir: &Path, scene_path: &Path, type_name: Option<&str>) -> CliResult<()> {
    let container = container(project_dir, None)?;
    let loaded = container.scene_service().load(scene_path)?;
    let types = &loaded.scene.types;
    let options = container.settings.bind_options();

    if let Some(name) = type_name {
        if !types.contains(name) {
            return Err(CliError::InvalidArgs(format!("unknown type: {name}")));
        }
    }

    let selected = types
        .iter()
        .filter(|t| type_name.map_or(true, |n| n == t.name))
        .filter(|t| types.is_bindable(&t.name));

    for decl in selected {
        let plan = classify(types, &decl.name, &options);
        output::header(&decl.name);
        let rows = plan
            .descendants
            .iter()
            .map(|(_, f)| (f, "down"))
            .chain(plan.ancestors.iter().map(|(_, f)| (f, "up")))
            .sorted_by(|a, b| a.0.key.cmp(&b.0.key));
        for (field, direction) in rows {
            output::detail(&plan_row(field, direction, options.is_asset_key(&field.key)));
        }
    }
    Ok(())
}

fn plan_row(field: &BindableField, direction: &str, asset: bool) -> String {
    let mut row = format!(
        "{:<20} {:<5} {}.{}: {}",
        field.key, direction, field.declaring_type, field.raw_name, field.field_type
    );
    if let Some(name) = &field.explicit_name {
        row.push_str(&format!(" (named {name:?})"));
    }
    if asset {
        row.push_str(" (asset)");
    }
    row
}

#[instrument(skip(project_dir))]
fn cmd_tree(project_dir: &Path, scene_path: &Path) -> CliResult<()> {
    let container = container(project_dir, None)?;
    let loaded = container.scene_service().load(scene_path)?;
    output::info(&loaded.scene.hierarchy.to_tree_string());
    Ok(())
}

#[instrument(skip(project_dir))]
fn cmd_assets(project_dir: &Path, assets: Option<PathBuf>) -> CliResult<()> {
    let container = container(project_dir, assets)?;
    let mut binder = container.auto_binder();
    for (name, path) in binder.asset_index().iter() {
        output::info(&format!("{name}\t{path}"));
    }
    Ok(())
}

fn cmd_config(project_dir: &Path, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(Some(project_dir))?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => {
            if let Some(global) = global_config_path() {
                output::action("global", &global.display());
            }
            output::action("project", &project_config_path(project_dir).display());
        }
        ConfigCommands::Template => output::info(&Settings::template()),
    }
    Ok(())
}
