use std::fmt::Write;

use itertools::Itertools;

use crate::{Command, Message};

/// Most IRC servers limit messages to 512 bytes in length, including the trailing CR-LF characters.
pub const BYTE_LIMIT: usize = 512;

pub fn message(message: Message) -> String {
    let mut output = String::with_capacity(BYTE_LIMIT);

    if let Command::Raw(raw) = &message.command {
        let _ = write!(&mut output, "{raw}");
    } else {
        let command = message.command.command();
        let params = parameters(message.command.parameters());

        let _ = write!(&mut output, "{command} {params}");
    }

    let _ = write!(&mut output, "\r\n");

    output
}

fn parameters(parameters: Vec<String>) -> String {
    let params_len = parameters.len();
    parameters
        .into_iter()
        .enumerate()
        .map(|(index, param)| {
            if index == params_len - 1 {
                trailing(param)
            } else {
                param
            }
        })
        .join(" ")
}

fn trailing(parameter: String) -> String {
    if parameter.contains(' ')
        || parameter.is_empty()
        || parameter.starts_with(':')
    {
        format!(":{parameter}")
    } else {
        parameter
    }
}

#[cfg(test)]
mod test {
    use crate::{Command, Message, command, format};

    #[test]
    fn commands() {
        let tests = [
            command!("PASS", "hunter2"),
            command!("nick", "alice"),
            command!("USER", "test", "test"),
            command!("join", "#general"),
            command!("join", "#private", "key"),
            command!("privmsg", "#a", "nospace"),
            command!("privmsg", "b", "spa ces"),
            command!("privmsg", "#a", "\u{1}ACTION waves\u{1}"),
            command!("quit", "nocolon"),
            command!("quit", ":startscolon"),
            command!("quit", "not:starting"),
            command!("quit", "not:starting space"),
            command!("notice", ""),
            command!("whois", "bob"),
            command!("away"),
        ];
        let expected = [
            "PASS hunter2\r\n",
            "NICK alice\r\n",
            "USER test 0 * test\r\n",
            "JOIN #general\r\n",
            "JOIN #private key\r\n",
            "PRIVMSG #a nospace\r\n",
            "PRIVMSG b :spa ces\r\n",
            "PRIVMSG #a :\u{1}ACTION waves\u{1}\r\n",
            "QUIT nocolon\r\n",
            "QUIT ::startscolon\r\n",
            "QUIT not:starting\r\n",
            "QUIT :not:starting space\r\n",
            "NOTICE :\r\n",
            "WHOIS bob\r\n",
            "AWAY \r\n",
        ];

        for (test, expected) in tests.into_iter().zip(expected) {
            let formatted = format::message(test);
            assert_eq!(formatted, expected);
        }
    }

    #[test]
    fn raw() {
        let message = Message::from(Command::Raw("MODE #test +nt".to_string()));

        assert_eq!(format::message(message), "MODE #test +nt\r\n");
    }
}
