extern crate satchel;

use satchel::res::Location;

#[test]
fn basic() {
    let location = Location::parse("asset:Sprites/Hero.prefab").unwrap();
    assert_eq!(location.scheme(), "asset");
    assert_eq!(location.path(), "Sprites/Hero");
    assert_eq!(location.extension(), "prefab");
    assert_eq!(location.as_str(), "asset:Sprites/Hero.prefab");
    assert_eq!(format!("{}", location), "asset:Sprites/Hero.prefab");

    let location = Location::parse("file:hello.txt").unwrap();
    assert_eq!(location.scheme(), "file");
    assert_eq!(location.path(), "hello");
    assert_eq!(location.extension(), "txt");
}

#[test]
fn first_colon_last_dot() {
    // The path is opaque and may contain further colons and dots.
    let location = Location::parse("zip:packs/base.pak:tiles/grass.png").unwrap();
    assert_eq!(location.scheme(), "zip");
    assert_eq!(location.path(), "packs/base.pak:tiles/grass");
    assert_eq!(location.extension(), "png");

    let location = Location::parse("asset:a.b.c").unwrap();
    assert_eq!(location.scheme(), "asset");
    assert_eq!(location.path(), "a.b");
    assert_eq!(location.extension(), "c");
}

#[test]
fn err() {
    // Identifier must have a scheme.
    assert!(Location::parse("Sprites/Hero.prefab").is_err());
    assert!(Location::parse(":Sprites/Hero.prefab").is_err());
    // Identifier must have an extension.
    assert!(Location::parse("asset:Sprites/Hero").is_err());
    assert!(Location::parse("asset:Sprites/Hero.").is_err());
    // Identifier must have a path.
    assert!(Location::parse("asset:.prefab").is_err());
    assert!(Location::parse("asset:").is_err());
    assert!(Location::parse("").is_err());
}
