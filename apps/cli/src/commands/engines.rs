use std::process::ExitCode;

use rotator_engine::Dispatcher;

pub fn run() -> ExitCode {
    for engine in Dispatcher::new().engines() {
        println!("{engine}");
    }
    ExitCode::SUCCESS
}
