//! Ferry end-to-end example: store arrays, read back a doubled view
//!
//! Starts an in-process server whose transform doubles every numeric
//! array. A client then writes named arrays of mixed shape and reads
//! the computed result back with shapes intact.
//!
//! Run with: cargo run -p ferry-client --example doubling

use std::sync::Arc;

use ferry_client::Client;
use ferry_record::{ArrayMap, NdArray, Scalars};
use ferry_server::{BoxError, Server, ServerConfig};

fn double(arrays: ArrayMap) -> Result<ArrayMap, BoxError> {
    let mut out = ArrayMap::new();
    for (name, array) in arrays.iter() {
        let data = match array.data() {
            Scalars::Int64(values) => Scalars::Int64(values.iter().map(|v| v * 2).collect()),
            Scalars::Float64(values) => Scalars::Float64(values.iter().map(|v| v * 2.0).collect()),
            Scalars::Text(values) => Scalars::Text(values.clone()),
        };
        out.insert(name, NdArray::new(array.shape().to_vec(), data)?);
    }
    Ok(out)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Ferry Doubling Demo ===\n");

    // Start a server on an ephemeral port
    let config = ServerConfig::new("127.0.0.1", 0);
    let server = Arc::new(Server::bind(&config, double).await.expect("Failed to bind"));
    let addr = server.local_addr().expect("Failed to get address");
    println!("Server listening on {}", addr);

    let runner = Arc::clone(&server);
    tokio::spawn(async move { runner.serve().await });

    // Connect and build the input arrays
    let mut client = Client::connect(addr).await.expect("Failed to connect");

    let mut arrays = ArrayMap::new();
    arrays.insert("prices", NdArray::vector_f64(vec![9.99, 24.50, 3.75]));
    arrays.insert(
        "counts",
        NdArray::new(vec![2, 2], vec![1i64, 2, 3, 4]).expect("Bad shape"),
    );

    println!("\nInput arrays:");
    for (name, array) in arrays.iter() {
        println!("  {} (shape {:?}): {:?}", name, array.shape(), array.data());
    }

    // One compute call: write, transform on the server, read back
    let result = client
        .compute("demo", &arrays)
        .await
        .expect("Compute failed");

    println!("\nDoubled arrays:");
    for (name, array) in result.iter() {
        println!("  {} (shape {:?}): {:?}", name, array.shape(), array.data());
    }

    let prices = result.get("prices").expect("Missing prices");
    assert_eq!(prices.data(), &Scalars::Float64(vec![19.98, 49.0, 7.5]));

    let counts = result.get("counts").expect("Missing counts");
    assert_eq!(counts.shape(), &[2, 2]);
    assert_eq!(counts.data(), &Scalars::Int64(vec![2, 4, 6, 8]));

    println!("\nShapes preserved, values doubled.");

    client.close().await.expect("Failed to close");
    server.shutdown();
}
