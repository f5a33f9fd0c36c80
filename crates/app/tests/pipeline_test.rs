//! End-to-end tests: description file -> machine -> message stream.
//!
//! These go through the same path as the binary: parse a description from
//! disk, build the machine, process a multi-message stream.

use enigma_app::input_gen::generate_sample;
use enigma_app::machine_config::{MachineConfig, STANDARD};
use enigma_app::session::{format_groups, Session};
use proptest::prelude::*;
use std::io::Write;

fn standard_session() -> Session {
    Session::new(MachineConfig::parse(STANDARD).unwrap().build().unwrap())
}

fn run(session: &mut Session, input: &str) -> String {
    let mut out = Vec::new();
    session.process(input.as_bytes(), &mut out).expect("processing failed");
    String::from_utf8(out).unwrap()
}

#[test]
fn test_description_from_file() {
    let path = std::env::temp_dir().join(format!("enigma-pipeline-{}.conf", std::process::id()));
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(STANDARD.as_bytes()).unwrap();
    drop(file);

    let config = MachineConfig::from_path(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    let mut session = Session::new(config.build().unwrap());
    let out = run(
        &mut session,
        "* B Beta III IV I AXLE (HQ) (EX) (IP) (TR) (BY)\nFROM his shoulder Hiawatha\n",
    );
    assert_eq!(out, "QVPQS OKOIL PUBKJ ZPISF XDW\n");
}

#[test]
fn test_multiple_message_groups() {
    let input = "\
* B Beta III IV I AXLE (HQ) (EX) (IP) (TR) (BY)
FROM his shoulder Hiawatha

* B BETA I II III AAAA
HELLO WORLD
";
    let mut session = standard_session();
    let out = run(&mut session, input);
    assert_eq!(out, "QVPQS OKOIL PUBKJ ZPISF XDW\n\nILBDA AMTAZ\n");
    assert_eq!(session.stats().settings_applied, 2);
    assert_eq!(session.stats().messages_converted, 2);
    assert_eq!(session.stats().chars_converted, 33);
}

#[test]
fn test_encrypt_then_decrypt_stream() {
    let settings = "* C GAMMA VIII VI V ZQRM (AZ) (BY) (CX)";
    let plain = ["Took the camera of rosewood", "Made of sliding folding rosewood", "Neatly put it all together"];

    let mut encrypt = standard_session();
    let cipher = run(&mut encrypt, &format!("{settings}\n{}\n", plain.join("\n")));

    let mut decrypt = standard_session();
    let recovered = run(&mut decrypt, &format!("{settings}\n{cipher}"));

    let expected: Vec<String> = plain
        .iter()
        .map(|line| format_groups(&line.replace(' ', "").to_uppercase()))
        .collect();
    assert_eq!(recovered.lines().collect::<Vec<_>>(), expected);
}

#[test]
fn test_sample_round_trips() {
    let config = MachineConfig::parse(STANDARD).unwrap();
    for seed in [0, 1, 42, 9_999] {
        let sample = generate_sample(&config, seed, 300).unwrap();
        let mut session = Session::new(config.build().unwrap());

        session.apply_settings(&sample.settings_line).unwrap();
        let cipher = session.process_line(&sample.plaintext).unwrap().unwrap();
        session.apply_settings(&sample.settings_line).unwrap();
        let plain = session.process_line(&cipher).unwrap().unwrap();

        assert_eq!(plain, format_groups(&sample.plaintext), "seed {seed}");
    }
}

proptest! {
    #[test]
    fn groups_preserve_text(msg in "[A-Z]{0,60}") {
        let grouped = format_groups(&msg);
        prop_assert_eq!(grouped.replace(' ', ""), msg.clone());
        for group in grouped.split(' ').filter(|g| !g.is_empty()) {
            prop_assert!(group.len() <= 5);
        }
        let groups: Vec<&str> = grouped.split(' ').collect();
        if let Some((last, full)) = groups.split_last() {
            prop_assert!(full.iter().all(|g| g.len() == 5));
            prop_assert!(last.len() <= 5);
        }
    }
}
