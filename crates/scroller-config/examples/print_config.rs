/// Example program to print the loaded configuration
///
/// Run with: cargo run -p scroller-config --example print_config

fn main() {
    let config = scroller_config::ScrollerConfig::load();

    println!("=== Scroller Configuration ===\n");

    println!("Transition:");
    println!("  Duration: {}ms", config.transition.duration_ms);
    println!("  Timing Function: {}", config.transition.timing_function);
    println!();

    println!("Demo:");
    println!("  Scene: {:?}", config.demo.scene);
    println!("  Step: {}", config.demo.step);
    println!("  End: {:?}", config.demo.end);
    println!("  Viewport Height: {}", config.demo.viewport_height);
    println!();

    match toml::to_string_pretty(&config) {
        Ok(toml_str) => {
            println!("=== Serialized Configuration ===");
            println!("{}", toml_str);
        }
        Err(e) => {
            eprintln!("Failed to serialize config: {}", e);
        }
    }
}
