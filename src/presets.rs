use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// A named style definition: the clause injected into every prompt, what the
/// model should avoid, and the output aspect ratio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    pub name: String,
    pub base_prompt: String,
    pub negative_prompt: String,
    pub aspect_ratio: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleCategory {
    pub category: String,
    pub presets: Vec<Preset>,
}

fn preset(name: &str, base_prompt: &str, negative_prompt: &str) -> Preset {
    Preset {
        name: name.to_string(),
        base_prompt: base_prompt.to_string(),
        negative_prompt: negative_prompt.to_string(),
        aspect_ratio: "1:1".to_string(),
    }
}

/// The preset applied when the vectorize mode runs without a selection.
pub fn fallback_preset() -> Preset {
    Preset {
        name: "Default Vector".to_string(),
        base_prompt: "high quality vector art, clean lines, professional graphic design"
            .to_string(),
        negative_prompt: String::new(),
        aspect_ratio: "1:1".to_string(),
    }
}

/// The built-in style catalog, grouped the way the mode picker shows it.
pub fn catalog() -> &'static [StyleCategory] {
    &CATALOG
}

static CATALOG: Lazy<Vec<StyleCategory>> = Lazy::new(|| {
    vec![
        StyleCategory {
            category: "Vector".to_string(),
            presets: vec![
                preset(
                    "Flat Gradient",
                    "masterpiece vector art, flat illustration, smooth gradients, clean geometric shapes, minimalist composition, bold vibrant color palette, no outlines, modern graphic style, high resolution",
                    "3D, realistic, textured, sketchy, hand-drawn, noisy, blurry",
                ),
                preset(
                    "Line Art",
                    "high-quality line art vector, single-weight strokes, minimal detail, crisp black outlines on a clean white background, geometric precision, modern iconography, balanced negative space",
                    "filled shapes, gradients, colors, shading, realistic, shadows",
                ),
                preset(
                    "Isometric",
                    "professional isometric vector illustration, 30-degree projection, vibrant flat colors, clean geometric construction, technical precision, sharp edges, no perspective distortion, infographic style",
                    "perspective, 3D render, soft shadows, realistic, organic, hand-drawn",
                ),
                preset(
                    "Duotone",
                    "striking duotone vector art, high-contrast two-color palette, flat graphic shapes, modern poster design, bold silhouettes, minimalist aesthetic, strong visual impact",
                    "multicolor, gradients, 3D, realistic, detailed, soft",
                ),
                preset(
                    "Geometric Abstract",
                    "abstract geometric vector composition, overlapping shapes, bold primary color palette, Bauhaus influence, mathematical precision, clean edges, modern art print style",
                    "organic, realistic, 3D, textured, hand-drawn, figurative",
                ),
                preset(
                    "Retro Pop",
                    "retro pop art vector, bold halftone dot patterns, vibrant CMYK colors, thick black outlines, 1960s comic book aesthetic, flat graphic illustration, dynamic composition",
                    "realistic, 3D, muted colors, modern, minimal, photographic",
                ),
                preset(
                    "Minimal Icon",
                    "minimal vector icon, single solid color, simple geometric form, pixel-perfect sharp edges, modern UI icon style, scalable design, abundant negative space, clear communication",
                    "detailed, realistic, gradients, 3D, complex, textured",
                ),
                preset(
                    "Neo-Brutalism",
                    "bold neo-brutalist vector, high contrast, thick black borders, clashing vibrant colors, raw geometric shapes, intentional visual friction, modern graphic design",
                    "soft, elegant, gradients, realistic, subtle, pastel",
                ),
                preset(
                    "Retro-Futurism 80s",
                    "80s retro-futurism vector, synthwave aesthetic, neon grids, chrome reflections, sunset gradient, digital landscape, nostalgic futuristic vibe",
                    "modern, minimal, organic, realistic, muted colors",
                ),
                preset(
                    "Full Color Realism",
                    "high-fidelity vector art, true to life colors, photographic detail, exact color matching from reference, professional vector precision, vibrant and realistic",
                    "flat, stylized, abstract, monochrome, low detail",
                ),
                preset(
                    "Soft Pastel Fidelity",
                    "accurate vector representation, soft pastel tones, smooth color transitions, faithful to source image shapes, elegant and clean aesthetic",
                    "high contrast, neon, sharp, messy, 3D",
                ),
                preset(
                    "Minimalist monoline",
                    "ultra-clean monoline vector art, single-weight strokes, sophisticated minimalist design, black and white, geometric precision, modern iconography",
                    "thick lines, colorful, gradients, 3D, complex shading",
                ),
            ],
        },
        StyleCategory {
            category: "Typography Art".to_string(),
            presets: vec![
                preset(
                    "3D Isometric",
                    "masterpiece 3D isometric typography, architectural letter forms with clean geometric extrusion, hard drop shadows creating depth, rendered in a minimalist vector style, vibrant flat color palette on a solid background, high resolution",
                    "realistic, photographic, gradients, organic, textured, complex background",
                ),
                preset(
                    "Floral",
                    "masterpiece typography, letters intricately woven with lush, detailed botanical flowers and vines, elegant script or serif font base, soft pastel color palette, on a clean, solid-colored background, whimsical and romantic, high detail illustration",
                    "realistic, 3D render, dark colors, minimal, plain, complex background",
                ),
                preset(
                    "Retro Bubble",
                    "masterpiece of 70s retro bubble letter typography, glossy, inflated, and rounded letterforms with shiny highlights, groovy psychedelic aesthetic, vibrant and warm color palette (oranges, yellows, browns), on a clean solid background, vector illustration",
                    "sharp edges, minimal, realistic, modern, dark, complex background",
                ),
                preset(
                    "Neon Sign",
                    "masterpiece neon sign typography, realistic glowing glass tubes forming letters, bright, electric colors (pink, blue, green) with a vibrant hum, mounted on a dark brick wall or solid dark background for high contrast, retro-futuristic, 80s aesthetic",
                    "realistic photo, daylight, muted colors, minimal, complex background",
                ),
                preset(
                    "Liquid Chrome",
                    "masterpiece liquid chrome typography, futuristic Y2K aesthetic, melting fluid metal letters, high-gloss chrome with realistic reflections and refractions, abstract and dynamic, on a dark solid background",
                    "matte, realistic photo, vintage, minimal, dark, complex background",
                ),
                preset(
                    "Minimalist Swiss",
                    "masterpiece minimalist swiss typography, bold sans-serif letterforms, strict grid-based composition, clean modernist shapes, high contrast, on a solid background",
                    "decorative, ornate, realistic, 3D, hand-drawn, serif",
                ),
                preset(
                    "Wildstyle Graffiti",
                    "masterpiece wildstyle graffiti typography, complex interlocking letterforms, arrows and flourishes, vibrant spray paint colors, street art aesthetic, dynamic and urban, on a solid background",
                    "clean, corporate, minimal, elegant, realistic",
                ),
                preset(
                    "Stencil Street Art",
                    "masterpiece stencil street art typography, high contrast spray paint effect, banksy-style aesthetic, realistic drips and overspray, bold graphic impact, on a solid background",
                    "clean, smooth, colorful, realistic, 3D",
                ),
                preset(
                    "Geometric Block",
                    "masterpiece of geometric block typography, letters constructed from bold, solid shapes (circles, squares, triangles), Bauhaus and constructivist influence, primary color palette, on a clean solid background, minimalist and architectural",
                    "organic, realistic, decorative, complex, gradients, complex background",
                ),
                preset(
                    "Brutalist Block Type",
                    "masterpiece brutalist block typography, heavy solid industrial letterforms, raw and imposing graphic impact, high-contrast monochrome, minimal detail, on a solid background",
                    "soft, organic, colorful, decorative, elegant",
                ),
            ],
        },
        StyleCategory {
            category: "Monogram Art".to_string(),
            presets: vec![
                preset(
                    "Luxury Crest",
                    "masterpiece luxury crest monogram, a central serif letter embossed in gold, surrounded by an ornate, baroque-style frame with lions and crowns, on a solid navy blue background, royal and prestigious emblem",
                    "casual, modern, realistic, plain, colorful, complex background",
                ),
                preset(
                    "Minimalist Circle",
                    "masterpiece minimalist monogram, a single, clean sans-serif letter perfectly centered within a thin, geometric circle, modern and balanced branding, on a solid white background, high-resolution vector",
                    "ornate, decorative, realistic, complex, colorful, complex background",
                ),
                preset(
                    "Art Deco",
                    "masterpiece Art Deco monogram, a bold, geometric sans-serif initial set within a symmetrical, gold-lined frame with sunburst motifs, 1920s Gatsby glamour, on a solid black background, high contrast",
                    "modern, casual, realistic, organic, colorful, complex background",
                ),
                preset(
                    "Vintage Seal",
                    "masterpiece vintage seal monogram, a classic serif initial inside a circular badge with a slightly distressed, ink-stamped texture, heritage and authentic branding, on a solid cream-colored background",
                    "modern, clean, realistic, bright colors, minimal, complex background",
                ),
                preset(
                    "Interlocking Initials",
                    "masterpiece interlocking initials monogram, sophisticated fashion-style interlocked letterforms, minimalist and elegant, high contrast, on a solid background, vector art",
                    "separated, ornate, realistic, colorful, busy",
                ),
                preset(
                    "Geometric Shield",
                    "masterpiece geometric shield monogram, modern heraldry, sharp lines and geometric construction, tech-focused branding, bold and imposing, on a solid background",
                    "organic, vintage, realistic, soft, traditional",
                ),
                preset(
                    "Abstract Monoline",
                    "masterpiece abstract monoline monogram, single continuous line forming initials, sophisticated minimalist design, geometric precision, modern and clean, on a solid background",
                    "thick lines, colorful, gradients, 3D, complex shading",
                ),
                preset(
                    "Neon Outline",
                    "masterpiece neon outline monogram, a single letter formed by a glowing, electric blue or pink neon tube, cyberpunk and futuristic aesthetic, on a dark, solid purple background for high contrast, vibrant and energetic",
                    "vintage, muted, realistic, daylight, traditional, complex background",
                ),
                preset(
                    "Cyberpunk Emblem",
                    "masterpiece cyberpunk emblem monogram, neon lines and futuristic shapes, dark background for high contrast, glowing edges, electric energy, tech-noir aesthetic",
                    "vintage, muted, realistic, daylight, traditional",
                ),
                preset(
                    "Glitch Core",
                    "masterpiece glitch core monogram, digital corruption and fragmented initials, RGB split, pixelation, futuristic cyberpunk aesthetic, chaotic and technological",
                    "clean, smooth, vintage, organic, realistic",
                ),
            ],
        },
    ]
});
