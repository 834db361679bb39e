use vsss_kinematics::*;

fn main() {
    let wheel_radius = 3.4;
    let axle_length = 7.5;
    let kinematics_result = DifferentialDrive::new(wheel_radius, axle_length);

    let mut current_pose = SpatialCoordinates::new(85.0, 65.0, 0.0);
    let chassis_speeds = ChassisSpeeds::new(30.0, 0.0); // 30 cm/s forward, no turning
    let dt = 1.0 / 60.0; // One feed frame
    let num_steps = 10;

    match kinematics_result {
        Ok(kinematics) => {
            println!("Initializing simulation...");
            println!("  {}", kinematics);
            println!("  Initial Pose:   {}", current_pose);
            println!("  Chassis Speeds: {}", chassis_speeds);

            for face in [Face::Forward, Face::Reversed] {
                let wheels = kinematics.inverse_kinematics(chassis_speeds, face);
                println!("  Wheel speeds with {} face: {}", face, wheels);
            }

            println!("\nSimulating...");
            for i in 0..num_steps {
                match kinematics.update_pose(current_pose, chassis_speeds, dt) {
                    Ok(new_pose) => {
                        current_pose = new_pose;
                        println!("Step {:>2}: Pose: {}", i + 1, current_pose);
                    }
                    Err(e) => {
                        eprintln!("Error during simulation step {}: {}", i + 1, e);
                        break;
                    }
                }
            }

            println!("\nSimulation complete.");
            println!("Final Pose: {}", current_pose);
        }
        Err(e) => {
            eprintln!("Failed to initialize kinematics: {}", e);
            eprintln!("Please ensure wheel_radius ({}) and axle_length ({}) are positive.", wheel_radius, axle_length);
        }
    }
}
