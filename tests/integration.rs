//! Integration tests for ferry

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::task::JoinHandle;

use ferry::server::BoxError;
use ferry::{ArrayMap, Client, Echo, NdArray, Scalars, Server, ServerConfig, Transform};

async fn spawn_server(
    transform: impl Transform + 'static,
) -> (Arc<Server>, SocketAddr, JoinHandle<()>) {
    let config = ServerConfig::new("127.0.0.1", 0);
    let server = Arc::new(Server::bind(&config, transform).await.unwrap());
    let addr = server.local_addr().unwrap();

    let runner = Arc::clone(&server);
    let handle = tokio::spawn(async move {
        runner.serve().await.unwrap();
    });

    (server, addr, handle)
}

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

/// Test a full write/get roundtrip through a live server
#[tokio::test]
async fn test_echo_roundtrip() {
    let (_server, addr, _handle) = spawn_server(Echo).await;
    let mut client = Client::connect(addr).await.unwrap();

    let mut arrays = ArrayMap::new();
    arrays.insert("counts", NdArray::vector_i64(vec![3, 1, 4, 1, 5]));
    arrays.insert(
        "grid",
        NdArray::new(vec![2, 2], vec![0.5f64, 1.5, 2.5, 3.5]).unwrap(),
    );
    arrays.insert("label", NdArray::scalar_text("run-42"));

    client.write("orders", &arrays).await.unwrap();

    let table = client.get("orders").await.unwrap();
    let restored = ferry::codec::decode(&table).unwrap();

    assert_eq!(restored, arrays);
    client.close().await.unwrap();
}

/// Test that scalars, vectors, and higher-rank arrays keep their shapes
#[tokio::test]
async fn test_shapes_survive_transport() {
    let (_server, addr, _handle) = spawn_server(Echo).await;
    let mut client = Client::connect(addr).await.unwrap();

    let mut arrays = ArrayMap::new();
    arrays.insert("point", NdArray::scalar_i64(7));
    arrays.insert("row", NdArray::vector_i64(vec![1, 2, 3, 4, 5]));
    arrays.insert(
        "cube",
        NdArray::new(vec![2, 3, 4], (0..24i64).collect::<Vec<_>>()).unwrap(),
    );

    let result = client.compute("shapes", &arrays).await.unwrap();

    assert_eq!(result.get("point").unwrap().shape(), &[] as &[usize]);
    assert_eq!(result.get("row").unwrap().shape(), &[5]);
    assert_eq!(result.get("cube").unwrap().shape(), &[2, 3, 4]);
}

/// Test that the server-side transform is applied to the stored arrays
#[tokio::test]
async fn test_compute_applies_server_transform() {
    let (_server, addr, _handle) = spawn_server(double).await;
    let mut client = Client::connect(addr).await.unwrap();

    let mut arrays = ArrayMap::new();
    arrays.insert(
        "m",
        NdArray::new(vec![2, 3], vec![1i64, 2, 3, 4, 5, 6]).unwrap(),
    );

    let result = client.compute("double-me", &arrays).await.unwrap();
    let m = result.get("m").unwrap();

    assert_eq!(m.shape(), &[2, 3]);
    assert_eq!(m.data(), &Scalars::Int64(vec![2, 4, 6, 8, 10, 12]));
}

/// Test that unknown commands come back as a distinct error kind
#[tokio::test]
async fn test_get_unknown_command_not_found() {
    use ferry::client::Error;

    let (_server, addr, _handle) = spawn_server(Echo).await;
    let mut client = Client::connect(addr).await.unwrap();

    match client.get("never-stored").await {
        Err(Error::NotFound { command }) => assert_eq!(command, "never-stored"),
        other => panic!("Expected NotFound, got {:?}", other.map(|_| ())),
    }
}

/// Test that writing a command again replaces the stored table
#[tokio::test]
async fn test_overwrite_returns_latest() {
    let (_server, addr, _handle) = spawn_server(Echo).await;
    let mut client = Client::connect(addr).await.unwrap();

    let mut first = ArrayMap::new();
    first.insert("values", NdArray::vector_i64(vec![1, 2, 3]));
    client.write("job", &first).await.unwrap();

    let mut second = ArrayMap::new();
    second.insert("values", NdArray::vector_i64(vec![7]));
    client.write("job", &second).await.unwrap();

    let table = client.get("job").await.unwrap();
    let restored = ferry::codec::decode(&table).unwrap();

    assert_eq!(
        restored.get("values").unwrap().data(),
        &Scalars::Int64(vec![7])
    );
}

/// Test that concurrent clients under distinct commands stay isolated
#[tokio::test]
async fn test_concurrent_clients() {
    let (_server, addr, _handle) = spawn_server(Echo).await;

    let mut handles = Vec::new();
    for i in 0..4i64 {
        handles.push(tokio::spawn(async move {
            let mut client = Client::connect(addr).await.unwrap();
            let command = format!("job-{}", i);

            let mut arrays = ArrayMap::new();
            arrays.insert("values", NdArray::vector_i64(vec![i, i + 10, i + 20]));

            let result = client.compute(&command, &arrays).await.unwrap();
            assert_eq!(
                result.get("values").unwrap().data(),
                &Scalars::Int64(vec![i, i + 10, i + 20])
            );
        }));
    }

    for handle in handles {
        handle.await.unwrap();
    }
}

/// Test that the empty string is a legal command
#[tokio::test]
async fn test_empty_command_accepted() {
    let (_server, addr, _handle) = spawn_server(Echo).await;
    let mut client = Client::connect(addr).await.unwrap();

    let mut arrays = ArrayMap::new();
    arrays.insert("x", NdArray::scalar_i64(1));

    client.write("", &arrays).await.unwrap();
    let result = client.compute("", &arrays).await.unwrap();

    assert_eq!(result.get("x").unwrap().data(), &Scalars::Int64(vec![1]));
}

/// Test that an all-absent mapping stores a zero-column table, which then
/// has nothing to feed the transform on the way back out
#[tokio::test]
async fn test_all_absent_write_then_get_fails() {
    use ferry::client::Error;
    use ferry::net::fault;

    let (_server, addr, _handle) = spawn_server(Echo).await;
    let mut client = Client::connect(addr).await.unwrap();

    let mut arrays = ArrayMap::new();
    arrays.insert_opt("ghost", None);
    arrays.insert_opt("phantom", None);

    // The write itself succeeds: absent entries encode to no columns.
    client.write("sparse", &arrays).await.unwrap();

    match client.get("sparse").await {
        Err(Error::Server { code, .. }) => assert_eq!(code, fault::EMPTY_INPUT),
        other => panic!("Expected Server fault, got {:?}", other.map(|_| ())),
    }
}

/// Test that large arrays survive framing
#[tokio::test]
async fn test_large_array_roundtrip() {
    let (_server, addr, _handle) = spawn_server(Echo).await;
    let mut client = Client::connect(addr).await.unwrap();

    let values: Vec<i64> = (0..100_000).collect();
    let mut arrays = ArrayMap::new();
    arrays.insert("big", NdArray::vector_i64(values.clone()));

    let result = client.compute("bulk", &arrays).await.unwrap();

    assert_eq!(result.get("big").unwrap().shape(), &[100_000]);
    assert_eq!(result.get("big").unwrap().data(), &Scalars::Int64(values));
}

/// Test that a mapping with no entries is rejected before it leaves the client
#[tokio::test]
async fn test_empty_mapping_rejected() {
    use ferry::client::Error;
    use ferry::record::Error as RecordError;

    let (_server, addr, _handle) = spawn_server(Echo).await;
    let mut client = Client::connect(addr).await.unwrap();

    match client.write("nothing", &ArrayMap::new()).await {
        Err(Error::Codec(RecordError::EmptyInput)) => {}
        other => panic!("Expected EmptyInput, got {:?}", other),
    }
}

/// Test that a failing transform is reported as its own error kind
#[tokio::test]
async fn test_transform_error_reported() {
    use ferry::client::Error;

    fn singular(_arrays: ArrayMap) -> Result<ArrayMap, BoxError> {
        Err("matrix is singular".into())
    }

    let (_server, addr, _handle) = spawn_server(singular).await;
    let mut client = Client::connect(addr).await.unwrap();

    let mut arrays = ArrayMap::new();
    arrays.insert("m", NdArray::new(vec![2, 2], vec![1i64, 0, 0, 0]).unwrap());

    match client.compute("solve", &arrays).await {
        Err(Error::Transform { message }) => assert!(message.contains("matrix is singular")),
        other => panic!("Expected Transform, got {:?}", other.map(|_| ())),
    }
}

/// Test that shutdown stops the accept loop
#[tokio::test]
async fn test_shutdown_stops_server() {
    let (server, _addr, handle) = spawn_server(Echo).await;

    server.shutdown();

    tokio::time::timeout(std::time::Duration::from_secs(1), handle)
        .await
        .expect("Serve loop did not stop after shutdown")
        .unwrap();
}
