/// A known license and every spelling that should resolve to it.
#[derive(Debug)]
pub struct LicenseDefinition {
    pub short_name: &'static str,
    pub pretty_name: &'static str,
    pub other_names: &'static [&'static str],
}

impl LicenseDefinition {
    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        std::iter::once(self.short_name)
            .chain(std::iter::once(self.pretty_name))
            .chain(self.other_names.iter().copied())
    }
}

pub static DEFINITIONS: &[LicenseDefinition] = &[
    LicenseDefinition {
        short_name: "MIT",
        pretty_name: "MIT License",
        other_names: &[
            "Expat",
            "MIT license",
            "Expat license",
            "The MIT License",
            "The MIT License (MIT)",
        ],
    },
    LicenseDefinition {
        short_name: "Apache-2.0",
        pretty_name: "Apache License 2.0",
        other_names: &[
            "Apache2",
            "Apache 2.0",
            "Apache-2",
            "Apache License",
            "Apache Software License",
            "Apache License Version 2.0",
            "Apache License, Version 2.0",
            "The Apache Software License, Version 2.0",
            "ASL 2.0",
        ],
    },
    LicenseDefinition {
        short_name: "Apache-1.1",
        pretty_name: "Apache License 1.1",
        other_names: &["Apache 1.1", "Apache-1.1", "Apache Software License 1.1"],
    },
    LicenseDefinition {
        short_name: "BSD-3-Clause",
        pretty_name: "BSD 3-Clause License",
        other_names: &[
            "BSD 3-Clause",
            "New BSD",
            "Modified BSD",
            "NewBSD",
            "BSD-3",
            "3-clause BSD",
        ],
    },
    LicenseDefinition {
        short_name: "BSD-2-Clause",
        pretty_name: "BSD 2-Clause License",
        other_names: &["BSD 2-Clause", "Simplified BSD", "FreeBSD", "SimplifiedBSD", "BSD-2"],
    },
    LicenseDefinition {
        short_name: "0BSD",
        pretty_name: "BSD Zero Clause License",
        other_names: &["Zero-Clause BSD"],
    },
    LicenseDefinition {
        short_name: "ISC",
        pretty_name: "ISC License",
        other_names: &["ISCL"],
    },
    LicenseDefinition {
        short_name: "MPL-2.0",
        pretty_name: "Mozilla Public License 2.0",
        other_names: &["MPL 2.0", "MPL2", "Mozilla Public License, Version 2.0"],
    },
    LicenseDefinition {
        short_name: "MPL-1.1",
        pretty_name: "Mozilla Public License 1.1",
        other_names: &["MPL 1.1", "MPL1.1"],
    },
    LicenseDefinition {
        short_name: "GPL-2.0",
        pretty_name: "GNU General Public License v2.0",
        other_names: &["GPLv2", "GPL 2.0", "GPL-2", "GPL-2.0-only"],
    },
    LicenseDefinition {
        short_name: "GPL-3.0",
        pretty_name: "GNU General Public License v3.0",
        other_names: &["GPLv3", "GPL 3.0", "GPL-3", "GPL-3.0-only"],
    },
    LicenseDefinition {
        short_name: "LGPL-2.1",
        pretty_name: "GNU Lesser General Public License v2.1",
        other_names: &["LGPLv2.1", "LGPL 2.1", "LGPL-2.1-only"],
    },
    LicenseDefinition {
        short_name: "LGPL-3.0",
        pretty_name: "GNU Lesser General Public License v3.0",
        other_names: &["LGPLv3", "LGPL 3.0", "LGPL-3.0-only"],
    },
    LicenseDefinition {
        short_name: "AGPL-3.0",
        pretty_name: "GNU Affero General Public License v3.0",
        other_names: &["AGPLv3", "AGPL 3.0", "AGPL-3.0-only"],
    },
    LicenseDefinition {
        short_name: "EPL-1.0",
        pretty_name: "Eclipse Public License 1.0",
        other_names: &["EPL 1.0", "Eclipse Public License - v 1.0"],
    },
    LicenseDefinition {
        short_name: "EPL-2.0",
        pretty_name: "Eclipse Public License 2.0",
        other_names: &["EPL 2.0", "Eclipse Public License - v 2.0"],
    },
    LicenseDefinition {
        short_name: "CDDL-1.0",
        pretty_name: "Common Development and Distribution License 1.0",
        other_names: &["CDDL", "CDDL 1.0"],
    },
    LicenseDefinition {
        short_name: "Unlicense",
        pretty_name: "The Unlicense",
        other_names: &["The Unlicense (Unlicense)"],
    },
    LicenseDefinition {
        short_name: "CC0-1.0",
        pretty_name: "Creative Commons Zero v1.0 Universal",
        other_names: &["CC0", "CC0 1.0"],
    },
    LicenseDefinition {
        short_name: "Zlib",
        pretty_name: "zlib License",
        other_names: &["zlib", "zlib/libpng"],
    },
    LicenseDefinition {
        short_name: "Python-2.0",
        pretty_name: "Python License 2.0",
        other_names: &["PSF", "Python Software Foundation License"],
    },
    LicenseDefinition {
        short_name: "Ruby",
        pretty_name: "Ruby License",
        other_names: &["ruby"],
    },
    LicenseDefinition {
        short_name: "WTFPL",
        pretty_name: "Do What The F*ck You Want To Public License",
        other_names: &["WTFPL V2"],
    },
];
