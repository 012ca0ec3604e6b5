mod common {
    use std::io::Write;

    pub fn init() {
        let _ = env_logger::builder()
            .format(|buf, record| writeln!(buf, "{}", record.args()))
            .is_test(true)
            .try_init();
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use prefix_gaptree::{InsertOptions, Tree};

    #[test]
    fn test_compare_same_block_other_data() -> Result<(), Box<dyn Error>> {
        crate::common::init();
        let mut t = Tree::new();
        let mut t2 = Tree::new();
        t.insert("1.0.0.0/8", "reason1", InsertOptions::default())?;
        t2.insert("1.0.0.0/8", "reason2", InsertOptions::default())?;
        assert_eq!(t, t2);
        Ok(())
    }

    #[test]
    fn test_compare_merged_halves() -> Result<(), Box<dyn Error>> {
        let mut t = Tree::new();
        let mut t2 = Tree::new();
        t.insert("192.168.0.0/23", "reason1", InsertOptions::default())?;
        t2.insert("192.168.0.0/24", "reason2", InsertOptions::default())?;
        t2.insert("192.168.1.0/24", "reason3", InsertOptions::default())?;
        assert_eq!(t, t2);
        assert_eq!(t2, t);
        Ok(())
    }

    #[test]
    fn test_compare_unmerged_halves() -> Result<(), Box<dyn Error>> {
        let mut t = Tree::new();
        let mut t2 = Tree::new();
        let opts = InsertOptions::default().with_propagate_used(false);
        t.insert("192.168.0.0/23", "reason1", InsertOptions::default())?;
        t2.insert("192.168.0.0/24", "reason2", opts)?;
        t2.insert("192.168.1.0/24", "reason3", opts)?;
        // Same address space, but the /23 was never marked used.
        assert_ne!(t, t2);

        // Marking it by hand makes them the same again.
        let id = t2
            .lookup("192.168.1.0/24")?
            .ok_or("192.168.1.0/24 not found")?;
        t2.check_recursively_used(id);
        assert_eq!(t, t2);
        Ok(())
    }

    #[test]
    fn test_compare_different_blocks() -> Result<(), Box<dyn Error>> {
        let mut t = Tree::new();
        let mut t2 = Tree::new();
        t.insert("10.0.0.0/8", "a", InsertOptions::default())?;
        t2.insert("11.0.0.0/8", "a", InsertOptions::default())?;
        assert_ne!(t, t2);

        t.insert("11.0.0.0/8", "b", InsertOptions::default())?;
        t2.insert("10.0.0.0/8", "b", InsertOptions::default())?;
        assert_eq!(t, t2);
        Ok(())
    }

    #[test]
    fn test_compare_empty_and_unused() -> Result<(), Box<dyn Error>> {
        let empty: Tree<&str> = Tree::new();
        assert_eq!(empty, Tree::default());

        // Unused inserts do not allocate anything.
        let mut t = Tree::new();
        t.insert(
            "172.16.0.0/12",
            "pool",
            InsertOptions::default().with_mark_used(false),
        )?;
        assert_eq!(t, empty);
        Ok(())
    }

    #[test]
    fn test_compare_nested_allocation() -> Result<(), Box<dyn Error>> {
        let mut t = Tree::new();
        let mut t2 = Tree::new();
        t.insert("10.0.0.0/8", "outer", InsertOptions::default())?;
        t2.insert("10.0.0.0/8", "outer", InsertOptions::default())?;
        t2.insert("10.1.0.0/16", "inner", InsertOptions::default())?;
        assert_eq!(t, t2);
        assert_ne!(t2.used_prefixes().count(), t.used_prefixes().count());
        Ok(())
    }
}
