// Database text handling through the public API.
use padmap::{
    Binding, Config, GamepadAxis, GamepadButton, HatMask, MappingDatabase, PadState, Platform,
    SourceKind,
};

const DUPLICATES: &str = "\
# comment lines and junk are skipped
not a record
03000000d01100001234000000000000,First Pad,a:b0,b:b1,platform:Linux,
03000000d01100001234000000000000,Second Pad,a:b5,b:b6,platform:Linux,
03000000d01100001234000000000000,Windows Pad,a:b9,platform:Windows,
";

#[test]
fn first_matching_record_wins() {
    let db = MappingDatabase::from_text(DUPLICATES);
    let linux = db.lookup(0x11d0, 0x3412, Platform::Linux).unwrap();
    assert_eq!(linux.name, "First Pad");
    assert_eq!(linux.button(GamepadButton::A), Binding::Button(0));

    let windows = db.lookup(0x11d0, 0x3412, Platform::Windows).unwrap();
    assert_eq!(windows.name, "Windows Pad");
    assert!(db.lookup(0x11d0, 0x3412, Platform::Android).is_none());
    assert!(db.lookup(0, 0, Platform::Linux).is_none());
}

#[test]
fn malformed_sources_are_inert() {
    let db = MappingDatabase::from_text(
        "03000000d01100001234000000000000,Broken,a:,b:x3,x:h0,y:h0.,back:b,start:b99999,guide:h0.16,leftx:a,platform:Linux,\n",
    );
    let mapping = db.lookup(0x11d0, 0x3412, Platform::Linux).unwrap();
    for button in GamepadButton::ALL {
        assert_eq!(mapping.button(button).kind(), SourceKind::None, "{button:?}");
    }
    for axis in GamepadAxis::ALL {
        assert_eq!(mapping.axis(axis).kind(), SourceKind::None, "{axis:?}");
    }

    let mut pad = PadState::default();
    pad.attach("Broken", 0x11d0, 0x3412, 15, 6, Default::default());
    for button in GamepadButton::ALL {
        assert!(!mapping.button(button).read_button(&pad));
        assert!(!mapping.button(button).read_button_pressed(&pad));
    }
    for axis in GamepadAxis::ALL {
        assert_eq!(mapping.axis(axis).read_axis(&pad), 0.0);
    }
}

#[test]
fn hat_and_inversion_tokens() {
    let mut pad = PadState::default();
    pad.attach("Pad", 1, 1, 4, 4, Default::default());
    pad.hat_y = -1.0;
    pad.axes[3] = 0.6;

    let up = Binding::parse("h0.1");
    assert!(up.read_button(&pad));
    for mask in [2, 4, 8] {
        assert!(!Binding::Hat { hat: 0, mask: HatMask(mask) }.read_button(&pad));
    }
    pad.hat_y = 0.0;
    pad.hat_x = 1.0;
    assert!(Binding::parse("h0.2").read_button(&pad));
    assert!(!up.read_button(&pad));

    assert_eq!(Binding::parse("-a3").read_axis(&pad), -0.6);
    assert_eq!(Binding::parse("+a3").read_axis(&pad), 0.6);
    assert_eq!(Binding::parse("a3").read_axis(&pad), 0.6);
    assert_eq!(Binding::parse("a3~").read_axis(&pad), -0.6);
}

#[test]
fn mapping_files_come_before_builtin() {
    let path = std::env::temp_dir().join(format!("padmap-test-{}.txt", std::process::id()));
    std::fs::write(
        &path,
        "030000005e0400008e02000000000000,File Pad,a:b7,platform:Linux,\n",
    )
    .unwrap();

    let config = Config {
        mapping_files: vec![path.clone()],
        ..Config::default()
    };
    let db = config.database().unwrap();
    std::fs::remove_file(&path).unwrap();

    let mapping = db.lookup(0x045e, 0x028e, Platform::Linux).unwrap();
    assert_eq!(mapping.name, "File Pad");
    assert_eq!(mapping.button(GamepadButton::A), Binding::Button(7));
}

#[test]
fn missing_mapping_file_is_an_error() {
    let config = Config {
        mapping_files: vec!["/nonexistent/padmap/gamecontrollerdb.txt".into()],
        ..Config::default()
    };
    assert!(matches!(config.database(), Err(padmap::Error::Io { .. })));
}
