use rand::seq::SliceRandom;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tip {
    pub title: &'static str,
    pub text: &'static str,
}

pub const TIPS: &[Tip] = &[
    Tip {
        title: "Look ahead",
        text: "Relax your wrists and look ahead while solving instead of focusing only on the pieces already in your hands.",
    },
    Tip {
        title: "Cross",
        text: "Plan the whole cross during inspection. Close your eyes and picture where each edge will go.",
    },
    Tip {
        title: "Efficient F2L",
        text: "Avoid regrips. Learn to insert F2L pairs from every angle.",
    },
    Tip {
        title: "Inspection is key",
        text: "Use all of your inspection time. Up to 15 seconds is allowed and it makes a huge difference to the start of a solve.",
    },
    Tip {
        title: "Turn slowly",
        text: "Turning slowly without pauses is often faster than turning very fast with long pauses to find pieces.",
    },
    Tip {
        title: "Learning algorithms",
        text: "Do not learn algorithms from the letters alone. Watch how the pieces move and build muscle memory.",
    },
    Tip {
        title: "Targeted practice",
        text: "Run sessions that drill one step only, such as crosses or slow F2L.",
    },
];

/// Pick a tip uniformly at random
pub fn random_tip<R: Rng + ?Sized>(rng: &mut R) -> Tip {
    *TIPS.choose(rng).unwrap_or(&TIPS[0])
}
