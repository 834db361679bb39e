use vsss_kinematics::Kinematic;
use vsss_navigation::*;

fn main() {
    let mut world = World::new(FieldGeometry::default(), DriveProfile::default()).unwrap();

    let me = world.spawn_robot(1, TeamColor::Blue).unwrap();
    let mate = world.spawn_robot(2, TeamColor::Blue).unwrap();
    let carrier = world.spawn_robot(1, TeamColor::Yellow).unwrap();
    let keeper = world.spawn_robot(0, TeamColor::Yellow).unwrap();
    world.assign_rosters_by_team();

    let positions = [
        (me, 60.0, 60.0),
        (mate, 60.0, 110.0),
        (carrier, 65.0, 60.0),
        (keeper, 15.0, 65.0),
    ];
    for (id, x, y) in positions {
        world.ingest_robot(id, RobotSample { x, y, ..RobotSample::default() }).unwrap();
    }
    world.ingest_ball(BallSample::new(75.0, 60.0, 0.0, 0.0));

    println!("{}", world.ball());
    for robot in world.robots() {
        println!("{}", robot);
    }

    for strategy in [ObstacleStrategy::Nearest, ObstacleStrategy::Filtered] {
        match world.update_obstacle(me, strategy) {
            Ok(chosen) => println!("\n{:?} obstacle: {}", strategy, chosen),
            Err(e) => println!("\n{:?} obstacle failed: {}", strategy, e),
        }
    }

    let robot = world.robot(me).unwrap();
    println!("Stored obstacle: {}", robot.obstacle().coordinates());
}
