use clap::Parser;
use statetime::app::StateTimeApp;

fn main() {
    env_logger::init();
    let args = StateTimeApp::parse();
    args.op.run().unwrap()
}
