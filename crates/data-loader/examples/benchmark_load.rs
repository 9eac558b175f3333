use data_loader::DataIndex;
use std::path::Path;
use std::time::Instant;

fn main() {
    let data_dir = Path::new("data/sample");

    println!("Loading dataset from {}...\n", data_dir.display());

    let start = Instant::now();
    let index = match DataIndex::load_from_files(data_dir) {
        Ok(index) => index,
        Err(e) => {
            eprintln!("Failed to load dataset: {}", e);
            std::process::exit(1);
        }
    };
    let elapsed = start.elapsed();

    let (profiles, content, interactions) = index.counts();

    println!("=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Profiles: {}", profiles);
    println!("Content items: {}", content);
    println!("Interactions: {}", interactions);
}
