mod bus;
mod config;
mod control;
mod sim;

use std::time::Duration;

use anyhow::Context;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};
use tracing_subscriber::{self, EnvFilter};

use vsss_kinematics::Kinematic;
use vsss_navigation::{TeamColor, World};

use bus::{TeamCommand, Topic, TopicActuator};
use config::Settings;
use sim::Simulator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let settings = config::load_settings().context("loading match configuration")?;
    info!(
        robots_per_team = settings.sim.robots_per_team,
        strategy = ?settings.sim.obstacle_strategy,
        "Match harness started."
    );

    run(settings).await
}

async fn run(settings: Settings) -> anyhow::Result<()> {
    let command_topic: Topic<TeamCommand> = Topic::new(64);
    let telemetry = tokio::spawn(telemetry_task(command_topic.subscribe()));

    let mut world = World::new(settings.field.clone(), settings.drive.clone())?;
    let mut sim = Simulator::new(
        settings.drive.simulator_chassis()?,
        settings.field.clone(),
        settings.sim.dt(),
        settings.sim.ball_damping,
        command_topic.subscribe(),
    );

    for team in [TeamColor::Blue, TeamColor::Yellow] {
        for index in 0..settings.sim.robots_per_team {
            let id = world.spawn_robot(index, team)?;
            sim.add_robot(id, index, team, Simulator::kickoff_pose(world.field(), team, index));
        }
    }
    world.assign_rosters_by_team();

    let mut blue_tx = TopicActuator::new(TeamColor::Blue, command_topic.clone());
    let mut yellow_tx = TopicActuator::new(TeamColor::Yellow, command_topic.clone());

    let tick_hz = u64::from(settings.sim.tick_hz.max(1));
    let mut ticker = tokio::time::interval(Duration::from_secs_f64(settings.sim.dt()));

    for tick in 0..settings.sim.ticks() {
        ticker.tick().await;

        // Feed first, then obstacles, then commands.
        sim.step()?;
        world.ingest(sim.robot_samples(), sim.ball_sample())?;
        control::assign_targets(&mut world)?;

        for id in world.robot_ids() {
            if let Err(e) = world.update_obstacle(id, settings.sim.obstacle_strategy) {
                warn!(%id, error = %e, "Obstacle not updated, keeping the previous one.");
            }

            let decision = control::decide(world.robot(id)?, &settings.control);
            let robot = world.robot_mut(id)?;
            if decision.flip_face {
                robot.toggle_face();
                debug!(%id, face = %robot.face(), "Face swapped.");
            }

            let actuator = match robot.team() {
                TeamColor::Blue => &mut blue_tx,
                TeamColor::Yellow => &mut yellow_tx,
            };
            robot.set_velocity_command(decision.command.v, decision.command.omega, actuator)?;

            if robot.arrive() {
                debug!(%id, target = %robot.target().coordinates(), "Robot arrived.");
            }
        }

        if tick % tick_hz == 0 {
            info!(second = tick / tick_hz, ball = %world.ball().coordinates(), "Match clock.");
        }
    }

    for robot in world.robots() {
        info!(%robot, obstacle = %robot.obstacle().coordinates(), "Final state.");
    }

    // Closing every sender ends the telemetry task.
    drop(blue_tx);
    drop(yellow_tx);
    drop(command_topic);
    let sent = telemetry.await?;
    info!(sent, "Match finished.");
    Ok(())
}

async fn telemetry_task(
    mut commands: tokio::sync::broadcast::Receiver<std::sync::Arc<TeamCommand>>,
) -> usize {
    let mut sent = 0;
    loop {
        match commands.recv().await {
            Ok(msg) => {
                sent += 1;
                tracing::trace!(team = %msg.team, command = %msg.command, "Wheel command.");
            }
            Err(RecvError::Lagged(n)) => {
                warn!("Telemetry receiver lagged by {} commands.", n);
                sent += n as usize;
            }
            Err(RecvError::Closed) => break,
        }
    }
    sent
}
