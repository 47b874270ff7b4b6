use anyhow::Result;
use bytes::Bytes;
use storage_backend::{ObjectStore, ObjectStoreBackend, StorageConfig, stream};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Create local storage backend
    let storage_path = std::env::var("STORAGE_PATH").unwrap_or_else(|_| "./data".to_string());
    println!("Using storage path: {}", storage_path);

    let config = StorageConfig::local(storage_path);
    let storage = ObjectStoreBackend::from_config(config)?;

    // Store an object from a stream of chunks
    let chunks = vec![
        Bytes::from_static(b"fn main() {\n"),
        Bytes::from_static(b"    println!(\"hello\");\n"),
        Bytes::from_static(b"}\n"),
    ];
    let result = storage
        .store("snippets", "rust/hello.rs", stream::from_chunks(chunks))
        .await?;
    println!("\nStored {} (update: {})", result.address, result.was_update);

    // Storing again at the same address overwrites it
    let result = storage
        .store(
            "snippets",
            "rust/hello.rs",
            stream::from_bytes("fn main() {}\n"),
        )
        .await?;
    println!("Stored {} (update: {})", result.address, result.was_update);

    // Read it back
    let content = stream::collect(storage.get("snippets", "rust/hello.rs").await?).await?;
    println!("\nRetrieved content:\n{}", String::from_utf8_lossy(&content));

    // Delete twice to show idempotence
    let deleted = storage.delete("snippets", "rust/hello.rs").await?;
    println!("Deleted: {}", deleted);
    let deleted = storage.delete("snippets", "rust/hello.rs").await?;
    println!("Deleted again: {}", deleted);

    // Reading a deleted object is an error
    match storage.get("snippets", "rust/hello.rs").await {
        Ok(_) => println!("Unexpectedly found the object"),
        Err(e) => println!("Lookup after delete failed as expected: {}", e),
    }

    Ok(())
}
