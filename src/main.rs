use bound_together::{default_script, SimConfig, Simulation};
use zone_core::default_zones;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = SimConfig::default();
    log::info!(
        "[sim] running {:.0}s at {:.0} Hz (seed {})",
        config.run_for.as_secs_f32(),
        1.0 / config.timestep.as_secs_f32(),
        config.seed
    );

    let mut sim = Simulation::new(config, default_zones(), default_script());
    let summary = sim.run();

    log::info!(
        "[sim] done after {:.1}s: zone {} ({:?}), {} transitions, {} toggles",
        summary.elapsed.as_secs_f32(),
        summary.final_zone + 1,
        summary.phase,
        summary.transitions.len(),
        summary.toggles
    );
    log::info!("[sim] lit at exit: {}", summary.active_handles.join(", "));
    for change in &summary.transitions {
        log::debug!("[sim] {change:?}");
    }

    sim.shutdown();
    anyhow::ensure!(
        sim.registry.active_handles().is_empty(),
        "handles still lit after shutdown: {:?}",
        sim.registry.active_handles()
    );
    Ok(())
}
