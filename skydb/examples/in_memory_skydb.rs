// Copyright 2025 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

// Stores a small JSON document under a named key, updates it, and shows what happens
// when a stale revision is written. Runs entirely in memory; set SKYDB_LOG=all to see
// what the store does.

use sky_logging::{Level, LogBuilder};
use skydb::{Bytes, DataKey, Keypair, SkyDb};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (_reload_handle, _log_guard) =
        LogBuilder::new(vec![("skydb".to_string(), Level::INFO)]).initialize()?;

    let db = SkyDb::in_memory(Keypair::random());
    let data_key = DataKey::from_name("settings.json");
    println!("Owner: {}", db.registry().public_key());

    db.write(Bytes::from(r#"{"theme":"dark"}"#), &data_key, 1)
        .await?;
    db.write(Bytes::from(r#"{"theme":"light"}"#), &data_key, 2)
        .await?;

    let (data, revision) = db.read(&data_key).await?;
    // Prints `revision 2: {"theme":"light"}`
    println!("revision {revision}: {}", String::from_utf8_lossy(&data));

    if let Err(err) = db.write(Bytes::from("{}"), &data_key, 2).await {
        println!("Rewriting revision 2 failed as expected: {err} ({:?})", err.kind());
    }

    let missing = DataKey::from_name("never-written");
    match db.read(&missing).await {
        Err(err) if err.is_not_found() => println!("{missing} is empty"),
        other => println!("Unexpected result for {missing}: {other:?}"),
    }

    Ok(())
}
