mod app;

use retrowave_engine::logging::{init_logging, LoggingConfig};

use app::Application;

fn main() {
    init_logging(LoggingConfig::default());

    Application::new()
        .title("Retrowave")
        .size(1280.0, 720.0)
        .ramp("83148C", "5B1FD5")
        .run()
}
