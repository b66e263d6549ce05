//! Bibliothèque C des primitives de swap appelées par le code généré.
//!
//! Une primitive par largeur configurée, `void sqfs_swapinN(uintN_t *v)` :
//! relit les octets stockés en little-endian et réécrit la valeur dans
//! l'ordre de l'hôte, sur place. Jamais incluse dans les deux fragments.

use crate::config::{BitWidth, Config};

/// Prototypes (`swap.h`), sous garde `<PRIMITIVE_PREFIX>_H`.
pub fn render_header(cfg: &Config) -> String {
    let guard = format!("{}_H", cfg.naming.primitive_prefix.to_ascii_uppercase());
    let protos: String = cfg
        .widths
        .iter()
        .map(|w| format!("void {}(uint{w}_t *v);\n", cfg.primitive_name(*w)))
        .collect();
    format!("#ifndef {guard}\n#define {guard}\n\n#include <stdint.h>\n\n{protos}\n#endif\n")
}

/// Définitions (`swap.c`).
pub fn render_source(cfg: &Config) -> String {
    let bodies: String = cfg.widths.iter().map(|w| body(cfg, *w)).collect();
    format!("#include <stdint.h>\n{bodies}")
}

fn body(cfg: &Config, w: BitWidth) -> String {
    format!(
        "\nvoid {name}(uint{w}_t *v) {{\n\
         \tuint8_t *c = (uint8_t *)v;\n\
         \tuint{w}_t r = 0;\n\
         \tfor (int i = sizeof(*v) - 1; i >= 0; --i) {{\n\
         \t\tr <<= 8;\n\
         \t\tr += c[i];\n\
         \t}}\n\
         \t*v = r;\n\
         }}\n",
        name = cfg.primitive_name(w),
    )
}
