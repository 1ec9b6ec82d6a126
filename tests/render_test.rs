// SPDX-License-Identifier: MIT

use api_tree_diff::*;
use render::RenderOptions;
use utils::Result;

#[test]
fn render_test() -> Result<()> {
    for entry in std::path::Path::new("./tests/render_test").read_dir()? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }

        let path = entry.path();
        println!("Test: {}", path.display());

        let code_file = utils::read_code_file(path.join("input.json"))?;

        let expected = utils::read_bytes(path.join("expected.txt"))?;
        let text = render::render_forest(&code_file.review_lines, &RenderOptions::default());
        assert_eq!(String::from_utf8(expected)?, text);

        let code_only_path = path.join("expected_code_only.txt");
        if code_only_path.exists() {
            let expected = utils::read_bytes(code_only_path)?;
            let options = RenderOptions {
                skip_docs: true,
                ..Default::default()
            };
            let text = render::render_forest(&code_file.review_lines, &options);
            assert_eq!(String::from_utf8(expected)?, text);
        }
    }

    Ok(())
}
