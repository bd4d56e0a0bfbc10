//! Derived property lists for bundle products without one

use std::path::Path;

use crate::domain::entities::{Node, SideEffectDescriptor};
use crate::domain::value_objects::NodeKind;

/// Directory, relative to a node, that holds generated property lists
pub const DERIVED_INFO_PLISTS: &str = "Derived/InfoPlists";

/// Side effects creating a default `Info.plist` for `node`
///
/// Empty when the node declares its own property list or produces no
/// bundle that needs one.
pub fn derived_info_plist(root: &Path, node: &Node) -> Vec<SideEffectDescriptor> {
    if node.info_plist().is_some() {
        return Vec::new();
    }
    let Some(package_type) = package_type(node.kind()) else {
        return Vec::new();
    };

    let directory = root.join(node.path()).join(DERIVED_INFO_PLISTS);
    let file = directory.join(format!("{}-Info.plist", node.name()));
    vec![
        SideEffectDescriptor::create_directory(directory),
        SideEffectDescriptor::create_file(file, render(package_type)),
    ]
}

fn package_type(kind: NodeKind) -> Option<&'static str> {
    match kind {
        NodeKind::App => Some("APPL"),
        NodeKind::Framework => Some("FMWK"),
        NodeKind::UnitTests | NodeKind::Plugin => Some("BNDL"),
        NodeKind::StaticFramework
        | NodeKind::StaticLibrary
        | NodeKind::DynamicLibrary
        | NodeKind::Package => None,
    }
}

fn render(package_type: &str) -> String {
    let entries = [
        ("CFBundleDevelopmentRegion", "$(DEVELOPMENT_LANGUAGE)"),
        ("CFBundleExecutable", "$(EXECUTABLE_NAME)"),
        ("CFBundleIdentifier", "$(PRODUCT_BUNDLE_IDENTIFIER)"),
        ("CFBundleInfoDictionaryVersion", "6.0"),
        ("CFBundleName", "$(PRODUCT_NAME)"),
        ("CFBundlePackageType", package_type),
        ("CFBundleShortVersionString", "1.0"),
        ("CFBundleVersion", "1"),
    ];

    let mut out = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <!DOCTYPE plist PUBLIC \"-//Apple//DTD PLIST 1.0//EN\" \
         \"http://www.apple.com/DTDs/PropertyList-1.0.dtd\">\n\
         <plist version=\"1.0\">\n<dict>\n",
    );
    for (key, value) in entries {
        out.push_str(&format!("\t<key>{key}</key>\n\t<string>{value}</string>\n"));
    }
    out.push_str("</dict>\n</plist>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn apps_get_a_directory_then_a_plist() {
        let node = Node::new("App", "App", NodeKind::App);

        let effects = derived_info_plist(Path::new("/w"), &node);

        assert_eq!(effects.len(), 2);
        assert_eq!(
            effects[0].path(),
            PathBuf::from("/w/App/Derived/InfoPlists").as_path()
        );
        assert_eq!(
            effects[1].path(),
            PathBuf::from("/w/App/Derived/InfoPlists/App-Info.plist").as_path()
        );
        let SideEffectDescriptor::CreateFile { contents, .. } = &effects[1] else {
            panic!("expected a file");
        };
        let text = String::from_utf8(contents.clone()).unwrap();
        assert!(text.contains("<string>APPL</string>"));
    }

    #[test]
    fn declared_plists_and_libraries_need_nothing() {
        let declared = Node::new("App", "App", NodeKind::App).with_info_plist("App/Info.plist");
        let library = Node::new("Core", "Core", NodeKind::StaticLibrary);

        assert!(derived_info_plist(Path::new("/w"), &declared).is_empty());
        assert!(derived_info_plist(Path::new("/w"), &library).is_empty());
    }
}
