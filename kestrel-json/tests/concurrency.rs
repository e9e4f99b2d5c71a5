use std::sync::Arc;
use std::thread;

use kestrel::Reflect;
use kestrel_json::{Config, api};

#[derive(Reflect, Default, Debug, PartialEq)]
struct Job {
    id: u64,
    tags: Vec<String>,
    parent: Option<Box<Job>>,
}

#[test]
fn threads_share_one_compiled_codec() {
    kestrel_testhelpers::setup();
    let api = Config::new().freeze();
    let decoders = thread::scope(|scope| {
        let handles: Vec<_> = (0..8u64)
            .map(|i| {
                let api = api.clone();
                scope.spawn(move || {
                    let input = format!(r#"{{"id":{i},"tags":["t{i}"],"parent":{{"id":99}}}}"#);
                    let job: Job = api.from_str(&input).unwrap();
                    assert_eq!(job.id, i);
                    assert_eq!(job.parent.map(|p| p.id), Some(99));
                    let fresh = Job {
                        id: i,
                        ..Job::default()
                    };
                    assert_eq!(
                        api.to_string(&fresh).unwrap(),
                        format!(r#"{{"id":{i},"tags":[],"parent":null}}"#)
                    );
                    api.decoder_of::<Job>().unwrap()
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect::<Vec<_>>()
    });
    for decoder in &decoders[1..] {
        assert!(Arc::ptr_eq(&decoders[0], decoder));
    }
    assert!(Arc::ptr_eq(&decoders[0], &api.decoder_of::<Job>().unwrap()));
}

#[test]
fn separate_apis_compile_separately() {
    kestrel_testhelpers::setup();
    let other = Config::new().freeze();
    let ours = api().decoder_of::<Job>().unwrap();
    let theirs = other.decoder_of::<Job>().unwrap();
    assert!(!Arc::ptr_eq(&ours, &theirs));
    assert!(Arc::ptr_eq(&ours, &api().decoder_of::<Job>().unwrap()));
}
