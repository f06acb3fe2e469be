//! Phrase banks. Placeholders: `{scene}`, `{object}`, `{timeWord}`, `{toneWord}`,
//! `{lightWord}`, `{intensityWord}`, `{dominantColor}`, `{verb}`.

use caption_core::CaptionStyle;

const CINEMATIC: &[&str] = &[
    "别回头，{timeWord}会替我们保守秘密。",
    "你看见的是{dominantColor}，我看见的是回不去的{scene}。",
    "风在{scene}里拐了个弯，我们就此走散。",
    "把话说完很难，但沉默更难。",
    "如果{object}会说话，它一定先替你道歉。",
    "我{verb}了所有情绪，只剩一句真话。",
    "那一刻，{lightWord}光像一把刀，切开了我们。",
    "后来我才懂，最远的路是走向自己。",
    "{scene}不动，心却一直在逃。",
    "我们都在等一个不可能的回音。",
];

const NOIR: &[&str] = &[
    "{timeWord}把城市揉成一团烟，我把你藏进沉默里。",
    "真相不响，只在{object}的缝隙里发亮。",
    "别相信灯光，它只会把人照得更孤独。",
    "我讨厌{dominantColor}，因为它太像一句结案陈词。",
    "你越靠近，影子越像证词。",
    "在这座城里，连叹息都有回声。",
];

const YOUTH: &[&str] = &[
    "我们把{timeWord}当作借口，把未来当作勇气。",
    "那天的{scene}很安静，安静得只剩心跳。",
    "别怕迟到，喜欢总会赶上来。",
    "我没说出口的，都落在{object}里。",
    "你笑的时候，世界的{toneWord}就软了。",
];

const SUSPENSE: &[&str] = &[
    "别说你看见了什么，{scene}会记得更清楚。",
    "每一次{object}的闪烁，都是另一种提醒。",
    "我们以为在追真相，其实是在躲自己。",
    "线索很轻，像{timeWord}里的一粒尘。",
    "门没锁，心却先关上了。",
];

const SCI_FI: &[&str] = &[
    "在{timeWord}的尽头，时间只是另一种光。",
    "我把记忆压缩成{dominantColor}的脉冲，发给了你。",
    "宇宙很大，但{scene}刚好装得下想念。",
    "如果重启一次人生，我还是会选择这段误差。",
    "{object}在发光，像一条来自未来的讯号。",
];

pub fn templates(style: CaptionStyle) -> &'static [&'static str] {
    match style {
        CaptionStyle::Cinematic => CINEMATIC,
        CaptionStyle::Noir => NOIR,
        CaptionStyle::Youth => YOUTH,
        CaptionStyle::Suspense => SUSPENSE,
        CaptionStyle::SciFi => SCI_FI,
    }
}
