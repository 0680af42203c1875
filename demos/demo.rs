//! Build a shared Bloom filter, insert a few keys and query a mix of keys.
use fnvbloom::SyncBloomFilter;

fn main() -> Result<(), fnvbloom::Error> {
    tracing_subscriber::fmt::init();

    let bf = SyncBloomFilter::with_rate(10_000, 0.01)?;
    println!("{}", bf.info());

    for key in ["abhi", "golang", "bloom"] {
        bf.insert(key);
    }
    for key in ["abhi", "golang", "bloom", "kafka", "redis"] {
        println!("{}: {}", key, bf.contains(key));
    }

    Ok(())
}
