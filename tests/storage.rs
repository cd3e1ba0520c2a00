mod common;

use std::collections::HashSet;
use std::sync::Barrier;

use common::output_dir;
use trial_report_pdf::{DirStore, FileStore};

#[test]
fn uploads_round_trip() {
    let dir = output_dir("store_round_trip");
    let store = DirStore::create(dir.join("photos")).expect("create store");

    let stored = store.upload("front view.jpg", b"jpeg bytes").expect("upload");
    assert_eq!(stored.id, "front_view.jpg");
    assert!(stored.preview_url.starts_with("file://"));
    assert!(stored.preview_url.ends_with("front_view.jpg"));
    assert_eq!(store.fetch(&stored.id).as_deref(), Some(&b"jpeg bytes"[..]));
}

#[test]
fn uploads_never_overwrite() {
    let dir = output_dir("store_unique");
    let store = DirStore::new(&dir);

    let first = store.upload("micro.png", b"one").expect("first upload");
    let second = store.upload("micro.png", b"two").expect("second upload");
    let third = store.upload("../micro.png", b"three").expect("third upload");

    assert_eq!(first.id, "micro.png");
    assert_eq!(second.id, "micro-1.png");
    assert_eq!(third.id, "micro-2.png");
    assert_eq!(store.fetch("micro.png").as_deref(), Some(&b"one"[..]));
    assert_eq!(store.fetch("micro-1.png").as_deref(), Some(&b"two"[..]));
}

#[test]
fn fetch_stays_inside_the_store() {
    let dir = output_dir("store_fetch");
    std::fs::write(dir.join("outside.jpg"), b"secret").expect("write");
    let store = DirStore::create(dir.join("inner")).expect("create store");

    assert_eq!(store.fetch("missing.jpg"), None);
    assert_eq!(store.fetch("../outside.jpg"), None);
    assert_eq!(store.fetch(""), None);
    assert_eq!(store.root(), dir.join("inner").as_path());
}

#[test]
fn concurrent_uploads_of_one_name_keep_every_file() {
    const THREADS: usize = 8;
    let dir = output_dir("store_concurrent");

    for round in 0..20 {
        let store = DirStore::create(dir.join(format!("round-{round}"))).expect("create store");
        let barrier = Barrier::new(THREADS);
        let stored: Vec<_> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..THREADS)
                .map(|t| {
                    let (store, barrier) = (&store, &barrier);
                    s.spawn(move || {
                        let bytes = format!("thread {t}").into_bytes();
                        barrier.wait();
                        let file = store.upload("same.jpg", &bytes).expect("upload");
                        (file.id, bytes)
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().expect("upload thread"))
                .collect()
        });

        let ids: HashSet<_> = stored.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids.len(), THREADS, "round {round}: ids collided: {ids:?}");
        for (id, bytes) in &stored {
            assert_eq!(store.fetch(id).as_ref(), Some(bytes), "round {round}: {id}");
        }
    }
}
