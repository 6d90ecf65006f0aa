use ordo::cli;

fn main() {
    cli::run();
}
