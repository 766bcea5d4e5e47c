//! pierce CLI - penetrating casts against scene descriptions
//!
//! Loads a JSON scene, optionally a TOML material table, and prints the
//! entrances, exits and remaining strength or speed of a cast as JSON.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use pierce::{
    penetrate, penetration_scene_cast_with_exit_hits, ricochet_cast, scene_cast_with_exit_hits,
    CastShape, ChainLimits, Channel, DepletionRules, NerfStack, Point3, ResourceKind, Rotation,
    SceneCastRequest, SceneDescription, SceneWorld, Speed, Strength, Vec3,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

mod config;
mod report;

use config::RunConfig;
use report::{ChainReport, SegmentReport, TraceReport};

#[derive(Parser)]
#[command(name = "pierce")]
#[command(about = "Penetrating, exit-aware casts with strength and speed depletion", long_about = None)]
struct Cli {
    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SceneArgs {
    /// JSON scene description
    #[arg(short, long)]
    scene: PathBuf,
    /// TOML file with [query] settings and [materials] profiles
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Sweep a sphere of this radius instead of a ray
    #[arg(long)]
    sphere: Option<f32>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Resource {
    Strength,
    Speed,
}

#[derive(Subcommand)]
enum Commands {
    /// List entrances and exits between two points
    Trace {
        #[command(flatten)]
        scene: SceneArgs,
        /// Cast start, as x,y,z
        #[arg(long, value_parser = parse_vec3)]
        from: [f32; 3],
        /// Cast end, as x,y,z
        #[arg(long, value_parser = parse_vec3)]
        to: [f32; 3],
        /// Stop at the first blocking object instead of penetrating
        #[arg(long)]
        stop_at_block: bool,
    },
    /// Spend a resource through everything between two points
    Cast {
        #[command(flatten)]
        scene: SceneArgs,
        /// Cast start, as x,y,z
        #[arg(long, value_parser = parse_vec3)]
        from: [f32; 3],
        /// Cast end, as x,y,z
        #[arg(long, value_parser = parse_vec3)]
        to: [f32; 3],
        /// Resource at the start
        #[arg(long)]
        value: f32,
        #[arg(long, value_enum, default_value = "strength")]
        resource: Resource,
        /// Per-distance falloff, overriding the config
        #[arg(long)]
        falloff: Option<f32>,
    },
    /// Fire along a direction, bouncing off ricochetable materials
    Ricochet {
        #[command(flatten)]
        scene: SceneArgs,
        /// Chain start, as x,y,z
        #[arg(long, value_parser = parse_vec3)]
        from: [f32; 3],
        /// Initial direction, as x,y,z
        #[arg(long, value_parser = parse_vec3)]
        dir: [f32; 3],
        /// Resource at the start
        #[arg(long)]
        value: f32,
        #[arg(long, value_enum, default_value = "speed")]
        resource: Resource,
        /// Total distance shared by all segments
        #[arg(long)]
        distance_cap: f32,
        #[arg(long)]
        max_ricochets: Option<u32>,
        /// Stop at the entrance after this many penetrated objects
        #[arg(long)]
        max_penetrations: Option<u32>,
        /// Per-distance falloff, overriding the config
        #[arg(long)]
        falloff: Option<f32>,
    },
    /// Display the objects and materials of a scene
    Info {
        /// JSON scene description
        scene: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Trace {
            scene,
            from,
            to,
            stop_at_block,
        } => {
            let run = Run::load(&scene)?;
            let request = run.request(from.into(), to.into(), scene.sphere);
            let cast = if stop_at_block {
                scene_cast_with_exit_hits(&run.world, &request, &run.config.query)
            } else {
                let rules = run.config.rules(&run.world);
                penetration_scene_cast_with_exit_hits(
                    &run.world,
                    &request,
                    |hit| rules.is_impenetrable(hit),
                    &run.config.query,
                )
            };
            print_json(&TraceReport::new(&run.world, &cast))?;
        }
        Commands::Cast {
            scene,
            from,
            to,
            value,
            resource,
            falloff,
        } => {
            let run = Run::load(&scene)?;
            let request = run.request(from.into(), to.into(), scene.sphere);
            let falloff = run.falloff(falloff)?;
            match resource {
                Resource::Strength => run.cast::<Strength>(&request, value, falloff)?,
                Resource::Speed => run.cast::<Speed>(&request, value, falloff)?,
            }
        }
        Commands::Ricochet {
            scene,
            from,
            dir,
            value,
            resource,
            distance_cap,
            max_ricochets,
            max_penetrations,
            falloff,
        } => {
            if distance_cap.is_nan() || distance_cap <= 0.0 {
                anyhow::bail!("--distance-cap must be positive, got {distance_cap}");
            }
            let direction = Vec3::from(dir);
            if direction.norm_squared() == 0.0 {
                anyhow::bail!("--dir must not be the zero vector");
            }
            let run = Run::load(&scene)?;
            let start = Point3::from(from);
            let request = run.request(start, start + direction.normalize(), scene.sphere);
            let mut limits = ChainLimits::new(distance_cap);
            limits.ricochet_cap = max_ricochets;
            limits.penetration_cap = max_penetrations;
            let falloff = run.falloff(falloff)?;
            match resource {
                Resource::Strength => run.ricochet::<Strength>(&request, value, falloff, &limits)?,
                Resource::Speed => run.ricochet::<Speed>(&request, value, falloff, &limits)?,
            }
        }
        Commands::Info { scene } => {
            show_info(&scene)?;
        }
    }

    Ok(())
}

/// A loaded scene and its configuration.
struct Run {
    world: SceneWorld,
    config: RunConfig,
}

impl Run {
    fn load(args: &SceneArgs) -> Result<Self> {
        let world = load_scene(&args.scene)?;
        let config = RunConfig::load(args.config.as_deref())?;
        config.check_materials(&world);
        log::debug!(
            "Loaded {} objects and {} material profiles",
            world.len(),
            config.materials.len()
        );
        Ok(Self { world, config })
    }

    fn request(&self, start: Point3, end: Point3, sphere: Option<f32>) -> SceneCastRequest {
        let request = SceneCastRequest::new(start, end, Channel::PROJECTILE);
        match sphere {
            Some(radius) => request.with_shape(CastShape::Sphere { radius }, Rotation::identity()),
            None => request,
        }
    }

    fn falloff(&self, overridden: Option<f32>) -> Result<f32> {
        let falloff = overridden.unwrap_or(self.config.range_falloff);
        if falloff.is_nan() || falloff < 0.0 {
            anyhow::bail!("falloff must not be negative, got {falloff}");
        }
        Ok(falloff)
    }

    fn cast<R: ResourceKind>(&self, request: &SceneCastRequest, value: f32, falloff: f32) -> Result<()> {
        let segment = penetrate::<R, _, _>(
            &self.world,
            request,
            value,
            &mut NerfStack::with_range_falloff(falloff),
            &self.config.rules(&self.world),
            &self.config.query,
        );
        print_json(&SegmentReport::new(&self.world, &segment))
    }

    fn ricochet<R: ResourceKind>(
        &self,
        request: &SceneCastRequest,
        value: f32,
        falloff: f32,
        limits: &ChainLimits,
    ) -> Result<()> {
        let chain = ricochet_cast::<R, _, _>(
            &self.world,
            request,
            value,
            &mut NerfStack::with_range_falloff(falloff),
            &self.config.rules(&self.world),
            limits,
            &self.config.query,
        );
        print_json(&ChainReport::new(&self.world, &chain))
    }
}

fn load_scene(path: &Path) -> Result<SceneWorld> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading scene {}", path.display()))?;
    let description = SceneDescription::from_json(&json)
        .with_context(|| format!("parsing scene {}", path.display()))?;
    Ok(description.build()?)
}

fn print_json<T: Serialize>(report: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

fn parse_vec3(s: &str) -> Result<[f32; 3], String> {
    let values = s
        .split(',')
        .map(|v| v.trim().parse::<f32>().map_err(|e| format!("{v:?}: {e}")))
        .collect::<Result<Vec<_>, _>>()?;
    values
        .try_into()
        .map_err(|_| format!("expected x,y,z, got {s:?}"))
}

fn show_info(path: &Path) -> Result<()> {
    let world = load_scene(path)?;

    println!("pierce scene: {}", path.display());
    println!("  Objects: {}", world.len());

    for object in world.objects() {
        let material = object
            .material
            .and_then(|id| world.material_name(id))
            .unwrap_or("none");
        let t = object.pose.translation.vector;
        println!(
            "  {}: {} at ({}, {}, {}) (material: {}, bounding radius: {:.3})",
            object.id.0, object.name, t.x, t.y, t.z, material, object.body.bounding_radius
        );
    }

    Ok(())
}
