// Copyright 2025 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use async_trait::async_trait;
use eyre::Result;
use sky_logging::LogBuilder;
use skydb::{
    BlobTransport, Bytes, DataKey, ErrorKind, Keypair, MemoryNetwork, RegistryEntryType,
    RegistryValue, SkyDb, SkyDbApi, SkyDbError, Skylink, TransportError,
};

#[tokio::test]
async fn skydb_write_then_read_json() -> Result<()> {
    let _log_guard = LogBuilder::init_single_threaded_tokio_test();

    let db = SkyDb::in_memory(Keypair::random());
    let data_key = DataKey::new([0u8; 32]);
    let data = Bytes::from(r#"{"v":1}"#);

    db.write(data.clone(), &data_key, 1).await?;
    let (got, revision) = db.read(&data_key).await?;
    assert_eq!(got, data);
    assert_eq!(revision, 1);

    // same revision again
    let err = db
        .write(Bytes::from(r#"{"v":2}"#), &data_key, 1)
        .await
        .expect_err("revision 1 is taken");
    assert!(!err.is_not_found());
    assert_eq!(err.kind(), ErrorKind::RevisionConflict);
    assert!(!err.kind().is_retryable());

    // the failed write left the old value in place
    let (got, revision) = db.read(&data_key).await?;
    assert_eq!(got, data);
    assert_eq!(revision, 1);
    Ok(())
}

#[tokio::test]
async fn skydb_revisions_must_increase() -> Result<()> {
    let _log_guard = LogBuilder::init_single_threaded_tokio_test();

    let db = SkyDb::in_memory(Keypair::random());
    let data_key = DataKey::from_name("counter");

    for revision in [0u64, 1, 2, 10] {
        let data = Bytes::from(format!("value at {revision}"));
        db.write(data.clone(), &data_key, revision).await?;
        assert_eq!(db.read(&data_key).await?, (data, revision));
    }

    let err = db
        .write(Bytes::from_static(b"stale"), &data_key, 9)
        .await
        .expect_err("lower revision");
    assert_eq!(err.kind(), ErrorKind::RevisionConflict);
    Ok(())
}

#[tokio::test]
async fn skydb_keys_are_independent() -> Result<()> {
    let _log_guard = LogBuilder::init_single_threaded_tokio_test();

    let network = MemoryNetwork::new();
    let alice = SkyDb::with_transports(Keypair::random(), network.clone(), network.clone());
    let bob = SkyDb::with_transports(Keypair::random(), network.clone(), network);
    let data_key = DataKey::from_name("shared-name");

    alice.write(Bytes::from_static(b"alice"), &data_key, 5).await?;
    bob.write(Bytes::from_static(b"bob"), &data_key, 1).await?;

    assert_eq!(alice.read(&data_key).await?.0, Bytes::from_static(b"alice"));
    assert_eq!(bob.read(&data_key).await?.0, Bytes::from_static(b"bob"));

    let other_key = DataKey::from_name("other-name");
    assert!(alice.read(&other_key).await.is_err_and(|err| err.is_not_found()));
    Ok(())
}

#[tokio::test]
async fn skydb_missing_and_unreachable_entries_are_not_found() -> Result<()> {
    let _log_guard = LogBuilder::init_single_threaded_tokio_test();

    let db = SkyDb::in_memory(Keypair::random());
    let data_key = DataKey::from_name("missing");

    let err = db.read(&data_key).await.expect_err("never written");
    assert!(matches!(err, SkyDbError::NotFound));

    db.write(Bytes::from_static(b"here"), &data_key, 1).await?;
    db.blob_transport().set_lookup_timeout(true).await;
    let err = db.read(&data_key).await.expect_err("lookup timeout");
    assert!(err.is_not_found());
    assert!(err.kind().is_retryable());

    db.blob_transport().set_lookup_timeout(false).await;
    assert_eq!(db.read(&data_key).await?.0, Bytes::from_static(b"here"));
    Ok(())
}

#[tokio::test]
async fn skydb_dangling_pointer_is_not_found() -> Result<()> {
    let _log_guard = LogBuilder::init_single_threaded_tokio_test();

    let db = SkyDb::in_memory(Keypair::random());
    let data_key = DataKey::from_name("dangling");
    db.write(Bytes::from_static(b"soon gone"), &data_key, 1).await?;

    let (skylink, revision) = db.registry().read(&data_key).await?;
    assert_eq!(revision, 1);
    assert!(db.blob_transport().remove_blob(&skylink).await);

    let err = db.read(&data_key).await.expect_err("blob removed");
    assert!(err.is_not_found());

    // a new write repairs the slot
    db.write(Bytes::from_static(b"back"), &data_key, 2).await?;
    assert_eq!(
        db.read(&data_key).await?,
        (Bytes::from_static(b"back"), 2)
    );
    Ok(())
}

#[tokio::test]
async fn skydb_tampered_entry_fails_validation() -> Result<()> {
    let _log_guard = LogBuilder::init_single_threaded_tokio_test();

    let db = SkyDb::in_memory(Keypair::random());
    let data_key = DataKey::from_name("tampered");
    db.write(Bytes::from_static(b"original"), &data_key, 1).await?;

    let owner = *db.registry().public_key();
    let stored = db
        .blob_transport()
        .entry(&owner, &data_key)
        .await
        .ok_or_else(|| eyre::eyre!("entry missing"))?;

    // replace the payload, keep the signature
    let decoy: Skylink = db
        .blob_transport()
        .upload(Bytes::from_static(b"decoy"))
        .await?
        .parse()?;
    let (value, signature) = stored.into_parts();
    let tampered = RegistryValue::new(
        *value.data_key(),
        Bytes::copy_from_slice(&decoy.to_bytes()),
        value.revision(),
        value.entry_type(),
    );
    db.blob_transport()
        .insert_entry(
            &owner,
            skydb::SignedRegistryValue::new_with_signature(tampered, signature),
        )
        .await;

    let err = db.read(&data_key).await.expect_err("tampered payload");
    assert!(!err.is_not_found());
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(!err.kind().is_retryable());
    Ok(())
}

#[tokio::test]
async fn skydb_entry_with_garbage_payload_is_corrupt() -> Result<()> {
    let _log_guard = LogBuilder::init_single_threaded_tokio_test();

    let keypair = Keypair::random();
    let db = SkyDb::in_memory(keypair.clone());
    let data_key = DataKey::from_name("garbage");

    let signed = RegistryValue::new(
        data_key,
        Bytes::from_static(b"not a skylink"),
        1,
        RegistryEntryType::WithoutPubkey,
    )
    .sign(&keypair);
    db.blob_transport()
        .insert_entry(&keypair.public_key(), signed)
        .await;

    let err = db.read(&data_key).await.expect_err("garbage payload");
    assert_eq!(err.kind(), ErrorKind::CorruptEntry);
    Ok(())
}

/// Fails every call with a server error.
struct BrokenBlobs;

#[async_trait]
impl BlobTransport for BrokenBlobs {
    async fn upload(&self, _data: Bytes) -> Result<String, TransportError> {
        Err(TransportError::Api {
            status: 500,
            message: "upload failed".to_string(),
        })
    }

    async fn download(&self, _skylink: &str) -> Result<Bytes, TransportError> {
        Err(TransportError::Api {
            status: 502,
            message: "download failed".to_string(),
        })
    }
}

/// Uploads succeed but return something that is not a skylink.
struct MalformedBlobs;

#[async_trait]
impl BlobTransport for MalformedBlobs {
    async fn upload(&self, _data: Bytes) -> Result<String, TransportError> {
        Ok("definitely-not-a-skylink".to_string())
    }

    async fn download(&self, _skylink: &str) -> Result<Bytes, TransportError> {
        Err(TransportError::RootNotFound)
    }
}

#[tokio::test]
async fn skydb_transport_failures_keep_their_kind() -> Result<()> {
    let _log_guard = LogBuilder::init_single_threaded_tokio_test();

    let keypair = Keypair::random();
    let network = MemoryNetwork::new();
    let data_key = DataKey::from_name("broken");

    // seed the registry through a working store
    let working = SkyDb::with_transports(keypair.clone(), network.clone(), network.clone());
    working
        .write(Bytes::from_static(b"x"), &data_key, 1)
        .await?;

    let broken = SkyDb::with_transports(keypair.clone(), network.clone(), BrokenBlobs);
    let err = broken
        .write(Bytes::from_static(b"y"), &data_key, 2)
        .await
        .expect_err("upload fails");
    assert!(matches!(err, SkyDbError::Upload(_)));
    assert!(err.kind().is_retryable());

    let err = broken.read(&data_key).await.expect_err("download fails");
    assert!(matches!(err, SkyDbError::Download(_)));
    assert!(!err.is_not_found());

    let malformed = SkyDb::with_transports(keypair, network, MalformedBlobs);
    let err = malformed
        .write(Bytes::from_static(b"z"), &data_key, 3)
        .await
        .expect_err("upload returned garbage");
    assert!(matches!(err, SkyDbError::RegistryWrite(_)));
    assert_eq!(err.kind(), ErrorKind::Decode);
    Ok(())
}

#[tokio::test]
async fn skydb_trait_object_round_trip() -> Result<()> {
    let _log_guard = LogBuilder::init_single_threaded_tokio_test();

    let db: Box<dyn SkyDbApi> = Box::new(SkyDb::in_memory(Keypair::from_seed(&[9u8; 32])));
    let data_key = DataKey::from_name("boxed");
    db.write(Bytes::from_static(b"via trait"), &data_key, 4).await?;
    let (data, revision) = db.read(&data_key).await?;
    assert_eq!(data, Bytes::from_static(b"via trait"));
    assert_eq!(revision, 4);
    Ok(())
}
