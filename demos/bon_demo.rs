use rand::Rng;
use speedometer::{Color, GaugeCommand, GaugeConfig, Speedometer, Threshold};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Three colored zones, aligned so the middle one takes half the track
    let config = GaugeConfig::builder()
        .thresholds(vec![
            Threshold::new(0.0, 50.0).with_color("#43a047".parse()?),
            Threshold::new(50.0, 80.0).with_color("#fdd835".parse()?),
            Threshold::new(80.0, 100.0).with_color(Color::new(0xe5, 0x39, 0x35)),
        ])
        .stroke_width(4.0)
        .build();

    let mut gauge = Speedometer::new(config);

    let (sender, receiver) = mpsc::channel();

    thread::spawn(move || {
        let mut rng = rand::rng();
        loop {
            let commands = [
                GaugeCommand::SetLoading(rng.random_bool(0.1)),
                GaugeCommand::SetTarget(Some(rng.random_range(0.0..100.0))),
            ];

            if commands.iter().any(|cmd| sender.send(cmd.clone()).is_err()) {
                break;
            }

            thread::sleep(Duration::from_millis(1500));
        }
    });

    println!("Displaying speedometer with random targets");
    println!("Close the window to exit");

    gauge.show_with_commands("Speedometer demo", receiver)?;
    Ok(())
}
