use crate::{kgrep, kgrep_in, Dir};

#[test]
fn missing_pattern_flag_exits_two() -> anyhow::Result<()> {
    let run = kgrep(&["abc"], "abc\n")?;
    assert_eq!(run.code, 2);
    assert!(run.stderr.contains("usage"), "stderr: {}", run.stderr);

    assert_eq!(kgrep(&[], "abc\n")?.code, 2);
    assert_eq!(kgrep(&["-E"], "abc\n")?.code, 2);
    Ok(())
}

#[test]
fn only_matching_prints_each_span() -> anyhow::Result<()> {
    let run = kgrep(&["-o", "-E", "\\d+"], "a1b22\nnone\n333\n")?;
    assert_eq!(run.code, 0);
    assert_eq!(run.stdout, "1\n22\n333\n");
    Ok(())
}

#[test]
fn only_matching_with_start_anchor_prints_once_per_line() -> anyhow::Result<()> {
    let run = kgrep(&["-o", "-E", "^ab"], "ababab\n")?;
    assert_eq!(run.stdout, "ab\n");
    Ok(())
}

#[test]
fn only_matching_skips_empty_matches() -> anyhow::Result<()> {
    let run = kgrep(&["-o", "-E", "a*"], "baab\nxyz\n")?;
    assert_eq!(run.code, 0);
    assert_eq!(run.stdout, "aa\n");
    Ok(())
}

#[test]
fn color_always_highlights_matches() -> anyhow::Result<()> {
    let run = kgrep(&["--color=always", "-E", "na"], "banana\n")?;
    assert!(run.stdout.contains("\x1b["), "stdout: {:?}", run.stdout);
    assert!(run.stdout.starts_with('b'));
    Ok(())
}

#[test]
fn color_auto_is_plain_when_piped() -> anyhow::Result<()> {
    let run = kgrep(&["--color=auto", "-E", "na"], "banana\n")?;
    assert_eq!(run.stdout, "banana\n");
    let run = kgrep(&["--color", "-E", "na"], "banana\n")?;
    assert_eq!(run.stdout, "banana\n");
    Ok(())
}

#[test]
fn single_file_has_no_prefix() -> anyhow::Result<()> {
    let dir = Dir::new("single")?;
    dir.create("fruits.txt", "apple\nbanana\n")?;
    let run = kgrep_in(dir.path(), &["-E", "ban", "fruits.txt"], "")?;
    assert_eq!(run.code, 0);
    assert_eq!(run.stdout, "banana\n");
    Ok(())
}

#[test]
fn multiple_files_are_prefixed() -> anyhow::Result<()> {
    let dir = Dir::new("multi")?;
    dir.create("fruits.txt", "apple\nbanana\n")?;
    dir.create("veg.txt", "bean\ncarrot\n")?;
    let run = kgrep_in(dir.path(), &["-E", "^b", "fruits.txt", "veg.txt"], "")?;
    assert_eq!(run.code, 0);
    assert_eq!(run.stdout, "fruits.txt:banana\nveg.txt:bean\n");
    Ok(())
}

#[test]
fn recursive_search_walks_in_sorted_order() -> anyhow::Result<()> {
    let dir = Dir::new("recursive")?;
    dir.create("tree/b.txt", "pear\n")?;
    dir.create("tree/a.txt", "apple\npear tree\n")?;
    dir.create("tree/sub/c.txt", "no match\nprickly pear\n")?;
    let run = kgrep_in(dir.path(), &["-r", "-E", "pear", "tree"], "")?;
    assert_eq!(run.code, 0);
    assert_eq!(
        run.stdout,
        "tree/a.txt:pear tree\ntree/b.txt:pear\ntree/sub/c.txt:prickly pear\n"
    );
    Ok(())
}

#[test]
fn recursive_without_paths_searches_current_directory() -> anyhow::Result<()> {
    let dir = Dir::new("cwd")?;
    dir.create("one.txt", "needle\n")?;
    dir.create("two.txt", "hay\n")?;
    let run = kgrep_in(dir.path(), &["-r", "-E", "needle"], "")?;
    assert_eq!(run.stdout, "one.txt:needle\n");
    Ok(())
}

#[test]
fn directory_without_recursive_exits_two() -> anyhow::Result<()> {
    let dir = Dir::new("plaindir")?;
    dir.create("tree/a.txt", "apple\n")?;
    let run = kgrep_in(dir.path(), &["-E", "apple", "tree"], "")?;
    assert_eq!(run.code, 2);
    Ok(())
}

#[test]
fn missing_file_exits_two() -> anyhow::Result<()> {
    let dir = Dir::new("missing")?;
    let run = kgrep_in(dir.path(), &["-E", "a", "nope.txt"], "")?;
    assert_eq!(run.code, 2);
    assert!(run.stderr.contains("nope.txt"), "stderr: {}", run.stderr);
    Ok(())
}
