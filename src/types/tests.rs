use std::error::Error;
use std::str::FromStr;

use crate::types::errors::PrefixTreeError;
use crate::types::{path_to_dot_quad, BitPath, Cidr};

//------------ BitPath codec ------------------------------------------------

#[test]
fn test_path_to_dot_quad() -> Result<(), Box<dyn Error>> {
    assert_eq!(path_to_dot_quad("1111", 4)?, "240.0.0.0/4");
    assert_eq!(path_to_dot_quad("10100111111", 16)?, "167.224.0.0/16");
    assert_eq!(path_to_dot_quad("", 0)?, "0.0.0.0/0");
    assert_eq!(path_to_dot_quad("", 8)?, "0.0.0.0/8");
    assert_eq!(
        path_to_dot_quad("11111111111111111111111111111111", 32)?,
        "255.255.255.255/32"
    );
    Ok(())
}

#[test]
fn test_path_to_dot_quad_clears_host_bits() -> Result<(), Box<dyn Error>> {
    assert_eq!(path_to_dot_quad("1111", 2)?, "192.0.0.0/2");
    assert_eq!(path_to_dot_quad("0111", 0)?, "0.0.0.0/0");
    Ok(())
}

#[test]
fn test_path_to_dot_quad_rejects() {
    assert_eq!(
        path_to_dot_quad("1021", 4),
        Err(PrefixTreeError::InvalidPrefix("1021".to_string()))
    );
    assert_eq!(
        path_to_dot_quad("1", 33),
        Err(PrefixTreeError::PrefixLengthInvalid(33))
    );
    assert!(path_to_dot_quad(&"0".repeat(33), 32).is_err());
}

#[test]
fn test_bit_path_display_and_parse() -> Result<(), Box<dyn Error>> {
    let p = BitPath::from_str("00001010")?;
    assert_eq!(p.len(), 8);
    assert_eq!(p.bits(), 10);
    assert_eq!(p.to_string(), "00001010");
    assert_eq!(p.get(4), Some(1));
    assert_eq!(p.get(7), Some(0));
    assert_eq!(p.get(8), None);
    assert_eq!(p.truncate(5).to_string(), "00001");
    assert_eq!(BitPath::new().to_string(), "");
    assert!(BitPath::new().is_empty());
    Ok(())
}

#[test]
fn test_cidr_bit_path() -> Result<(), Box<dyn Error>> {
    let c = Cidr::from_str("10.0.0.0/8")?;
    assert_eq!(c.bit_path().to_string(), "00001010");
    let c = Cidr::from_str("137.43.0.0/16")?;
    assert_eq!(c.bit_path().to_string(), "1000100100101011");
    assert_eq!(Cidr::default_route().bit_path().to_string(), "");
    Ok(())
}

#[test]
fn test_codec_round_trip() -> Result<(), Box<dyn Error>> {
    for s in [
        "0.0.0.0/0",
        "128.0.0.0/1",
        "10.0.0.0/8",
        "172.16.0.0/12",
        "199.4.130.0/23",
        "255.255.255.254/31",
        "1.2.3.4/32",
    ] {
        let c = Cidr::from_str(s)?;
        assert_eq!(c.bit_path().to_cidr(c.len())?, c);
        assert_eq!(c.to_string(), s);
    }
    Ok(())
}

//------------ Cidr parsing -------------------------------------------------

#[test]
fn test_cidr_parse() -> Result<(), Box<dyn Error>> {
    let c = Cidr::from_str("127.0.0.1")?;
    assert_eq!(c.len(), 32);
    assert_eq!(c.to_string(), "127.0.0.1/32");

    for bad in [
        "",
        "10.0.0.0/33",
        "10.0.0.1/8",
        "10.0.0/8",
        "256.0.0.0/8",
        "10.0.0.0/x",
        " 10.0.0.0/8",
        "10.0.0.0/8\n",
        "10.0.0.0 /8",
        "127.0.0.1 ",
        "::/0",
        "2001:db8::/32",
    ] {
        assert_eq!(
            Cidr::from_str(bad),
            Err(PrefixTreeError::InvalidPrefix(bad.to_string())),
            "{} should not parse",
            bad
        );
    }
    Ok(())
}

#[test]
fn test_cidr_halves() -> Result<(), Box<dyn Error>> {
    let c = Cidr::from_str("192.168.0.0/23")?;
    assert_eq!(c.left_half(), Some(Cidr::from_str("192.168.0.0/24")?));
    assert_eq!(c.right_half(), Some(Cidr::from_str("192.168.1.0/24")?));
    assert_eq!(c.first_subnet(30), Some(Cidr::from_str("192.168.0.0/30")?));
    assert_eq!(c.first_subnet(22), None);
    assert!(c.covers(&Cidr::from_str("192.168.1.128/25")?));
    assert!(!c.covers(&Cidr::from_str("192.168.2.0/24")?));
    assert!(!c.covers(&Cidr::from_str("192.168.0.0/22")?));
    assert_eq!(Cidr::from_str("1.1.1.1/32")?.left_half(), None);
    Ok(())
}

#[test]
fn test_cidr_order() -> Result<(), Box<dyn Error>> {
    let mut v = vec![
        Cidr::from_str("10.1.0.0/16")?,
        Cidr::from_str("10.0.0.0/16")?,
        Cidr::from_str("10.0.0.0/8")?,
    ];
    v.sort();
    assert_eq!(
        v.iter().map(|c| c.to_string()).collect::<Vec<_>>(),
        vec!["10.0.0.0/8", "10.0.0.0/16", "10.1.0.0/16"]
    );
    Ok(())
}

#[test]
fn test_cidr_relaxed() -> Result<(), Box<dyn Error>> {
    let c = Cidr::new_relaxed("10.1.2.3".parse()?, 8)?;
    assert_eq!(c.to_string(), "10.0.0.0/8");
    assert!(Cidr::new("10.1.2.3".parse()?, 8).is_err());
    assert_eq!(
        Cidr::new_relaxed("10.1.2.3".parse()?, 40),
        Err(PrefixTreeError::PrefixLengthInvalid(40))
    );
    Ok(())
}
