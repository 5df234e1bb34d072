use clap::Parser;
use gtfs_pathways::app::PathwaysApp;

fn main() {
    env_logger::init();
    let args = PathwaysApp::parse();
    match args.op.run() {
        Ok(_) => log::info!("finished."),
        Err(e) => {
            log::error!("failed running gtfs_pathways: {e}");
            std::process::exit(1);
        }
    }
}
